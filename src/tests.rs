use crate::test_support::with_env_var;
use crate::{
    has_jongseong, make_entry, Analyzer, Feature, Jongseong, Mecab, MecabConfig, Morpheme,
    Result, Token, ABSENT_FIELD, DEFAULT_ENTRY_POS, DICTIONARY_FIELD_COUNT, FEATURE_FIELD_COUNT,
    MECAB_BOS_NODE, MECAB_EOS_NODE,
};
use std::path::PathBuf;

struct ScriptedAnalyzer;

impl Analyzer for ScriptedAnalyzer {
    fn analyze(&self, _sentence: &str) -> Result<Vec<(String, String)>> {
        Ok(vec![
            ("코로나".to_string(), "NNP,*,F,코로나,*,*,*,*".to_string()),
            (
                "합니다".to_string(),
                "XSA+EF,*,F,합니다,Inflect,XSA,EF,하/XSA/*+ᄇ니다/EF/*".to_string(),
            ),
        ])
    }
}

#[test]
fn layout_constants_are_stable() {
    assert_eq!(FEATURE_FIELD_COUNT, 8);
    assert_eq!(DICTIONARY_FIELD_COUNT, 12);
    assert_eq!(ABSENT_FIELD, "*");
    assert_eq!(DEFAULT_ENTRY_POS, "NNP");
    assert_eq!(MECAB_BOS_NODE, 2);
    assert_eq!(MECAB_EOS_NODE, 3);
}

#[test]
fn jongseong_examples() {
    assert!(has_jongseong("문").unwrap());
    assert!(!has_jongseong("다").unwrap());
    assert_eq!(make_entry("까비", "NNP", "*", None).unwrap().jongseong, Jongseong::Absent);
}

#[test]
fn feature_round_trip_normalizes_sentinels() {
    let raw = "NNG,*,T,상황,*,*,*,*";
    let feature = Feature::decode(raw).unwrap();
    assert_eq!(feature.semantic, None);
    assert_eq!(feature.encode(), raw);
    assert!(Feature::decode("NNG,*,T,상황,*,*,*").is_err());
}

#[test]
fn tag_views_through_facade() {
    let mecab = Mecab::with_analyzer(ScriptedAnalyzer);
    assert_eq!(
        mecab.pos_joined("코로나 합니다", false).unwrap(),
        vec!["코로나/NNP", "하/XSA", "ᄇ니다/EF"]
    );
    assert_eq!(
        mecab.pos("코로나 합니다", true).unwrap(),
        vec![
            Morpheme::new("코로나", "NNP"),
            Morpheme::new("합니다", "XSA+EF")
        ]
    );
    assert_eq!(mecab.nouns("코로나 합니다", false).unwrap(), vec!["코로나"]);

    let tokens: Vec<Token> = mecab.parse("코로나 합니다").unwrap();
    assert_eq!(tokens[1].feature.morph_type.as_deref(), Some("Inflect"));
}

#[test]
fn config_default_respects_mecab_library_path() {
    with_env_var("MECAB_LIBRARY_PATH", "/tmp/libmecab-test.so", || {
        let config = MecabConfig::default();
        assert_eq!(
            config.library_path,
            Some(PathBuf::from("/tmp/libmecab-test.so"))
        );
    });
}

#[test]
fn config_default_respects_mecab_dic_path() {
    with_env_var("MECAB_DIC_PATH", "/tmp/mecab-ko-dic-test", || {
        let config = MecabConfig::default();
        assert_eq!(
            config.dictionary_path,
            Some(PathBuf::from("/tmp/mecab-ko-dic-test"))
        );
        assert_eq!(config.to_args()[1..3], ["-d", "/tmp/mecab-ko-dic-test"]);
    });
}
