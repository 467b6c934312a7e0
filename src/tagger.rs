use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::MecabConfig;
use crate::constants::DEFAULT_PARSE_CACHE_CAPACITY;
use crate::error::Result;
use crate::format;
use crate::runtime::NativeTagger;
use crate::types::{Morpheme, Token};

/// Morphological analysis engine.
///
/// Given a sentence, returns the ordered `(surface, feature)` pairs of the
/// best path, or [`crate::MecabError::Analysis`] with the engine's message.
pub trait Analyzer {
    /// Analyzes one sentence.
    fn analyze(&self, sentence: &str) -> Result<Vec<(String, String)>>;
}

impl<A: Analyzer + ?Sized> Analyzer for &A {
    fn analyze(&self, sentence: &str) -> Result<Vec<(String, String)>> {
        (**self).analyze(sentence)
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&self, sentence: &str) -> Result<Vec<(String, String)>> {
        (**self).analyze(sentence)
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Arc<A> {
    fn analyze(&self, sentence: &str) -> Result<Vec<(String, String)>> {
        (**self).analyze(sentence)
    }
}

/// Korean part-of-speech tagger on top of an [`Analyzer`].
///
/// Decoded tokens are memoized per sentence in a small LRU cache, so asking
/// for `pos`, `morphs` and `nouns` of the same sentence analyzes it once.
pub struct Mecab<A: Analyzer = NativeTagger> {
    analyzer: A,
    cache_capacity: usize,
    parse_cache: Mutex<VecDeque<ParseCacheEntry>>,
}

impl Mecab<NativeTagger> {
    /// Creates a tagger using [`MecabConfig::default`].
    pub fn new() -> Result<Self> {
        Self::from_config(MecabConfig::default())
    }

    /// Creates a tagger with explicit library and dictionary settings.
    pub fn from_config(config: MecabConfig) -> Result<Self> {
        let capacity = config.parse_cache_capacity;
        let analyzer = NativeTagger::from_config(&config)?;
        Ok(Self::with_analyzer(analyzer).with_cache_capacity(capacity))
    }

    /// Directory of the loaded system dictionary.
    pub fn dictionary_path(&self) -> Result<Option<PathBuf>> {
        Ok(self
            .analyzer
            .system_dictionary()?
            .and_then(|info| info.directory().map(Path::to_path_buf)))
    }

    /// Compiled file of the loaded system dictionary.
    pub fn dictionary_filename(&self) -> Result<Option<PathBuf>> {
        Ok(self
            .analyzer
            .system_dictionary()?
            .map(|info| info.filename))
    }
}

impl<A: Analyzer> Mecab<A> {
    /// Wraps any analyzer, e.g. a fake one in tests.
    pub fn with_analyzer(analyzer: A) -> Self {
        Self {
            analyzer,
            cache_capacity: DEFAULT_PARSE_CACHE_CAPACITY,
            parse_cache: Mutex::new(VecDeque::new()),
        }
    }

    /// Sets the parse cache capacity; `0` disables caching.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        let cache = self
            .parse_cache
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.truncate(capacity);
        self
    }

    /// Underlying analyzer.
    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Drops every memoized sentence.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Analyzes `sentence` into decoded tokens, in engine order.
    ///
    /// # Errors
    /// [`crate::MecabError::Analysis`] from the engine, or
    /// [`crate::MecabError::MalformedFeature`] when a feature string does
    /// not have the expected shape.
    pub fn parse(&self, sentence: &str) -> Result<Vec<Token>> {
        if let Some(tokens) = self.lookup_parse_cache(sentence) {
            return Ok(tokens);
        }

        let tokens = self
            .analyzer
            .analyze(sentence)?
            .into_iter()
            .map(|(surface, feature)| Token::from_raw(surface, &feature))
            .collect::<Result<Vec<_>>>()?;
        log::trace!("analyzed {} tokens", tokens.len());

        self.insert_parse_cache(sentence, &tokens);
        Ok(tokens)
    }

    /// `(surface, tag)` pairs; see [`format::pos`].
    pub fn pos(&self, sentence: &str, flatten: bool) -> Result<Vec<Morpheme>> {
        format::pos(&self.parse(sentence)?, flatten)
    }

    /// `surface/tag` strings; see [`format::pos_joined`].
    pub fn pos_joined(&self, sentence: &str, flatten: bool) -> Result<Vec<String>> {
        format::pos_joined(&self.parse(sentence)?, flatten)
    }

    /// Surface texts of [`Self::pos`].
    pub fn morphs(&self, sentence: &str, flatten: bool) -> Result<Vec<String>> {
        format::morphs(&self.parse(sentence)?, flatten)
    }

    /// Noun surfaces of [`Self::pos`].
    pub fn nouns(&self, sentence: &str, flatten: bool) -> Result<Vec<String>> {
        format::nouns(&self.parse(sentence)?, flatten)
    }

    /// Noun pairs of [`Self::pos`].
    pub fn noun_morphemes(&self, sentence: &str, flatten: bool) -> Result<Vec<Morpheme>> {
        format::noun_morphemes(&self.parse(sentence)?, flatten)
    }

    fn lock_cache(&self) -> MutexGuard<'_, VecDeque<ParseCacheEntry>> {
        self.parse_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lookup_parse_cache(&self, sentence: &str) -> Option<Vec<Token>> {
        if self.cache_capacity == 0 {
            return None;
        }
        let fingerprint = TextFingerprint::of(sentence);
        let mut cache = self.lock_cache();
        let index = cache
            .iter()
            .position(|entry| entry.matches(sentence, fingerprint))?;
        let entry = cache.remove(index)?;
        let tokens = entry.tokens.clone();
        cache.push_front(entry);
        Some(tokens)
    }

    fn insert_parse_cache(&self, sentence: &str, tokens: &[Token]) {
        if self.cache_capacity == 0 {
            return;
        }
        let fingerprint = TextFingerprint::of(sentence);
        let mut cache = self.lock_cache();
        if let Some(index) = cache
            .iter()
            .position(|entry| entry.matches(sentence, fingerprint))
        {
            let _ = cache.remove(index);
        }
        while cache.len() >= self.cache_capacity {
            cache.pop_back();
        }
        cache.push_front(ParseCacheEntry {
            fingerprint,
            text: sentence.to_string(),
            tokens: tokens.to_vec(),
        });
    }

    #[cfg(test)]
    pub(crate) fn cached_sentences(&self) -> Vec<String> {
        self.lock_cache()
            .iter()
            .map(|entry| entry.text.clone())
            .collect()
    }
}

struct ParseCacheEntry {
    fingerprint: TextFingerprint,
    text: String,
    tokens: Vec<Token>,
}

impl ParseCacheEntry {
    fn matches(&self, text: &str, fingerprint: TextFingerprint) -> bool {
        self.fingerprint == fingerprint && self.text == text
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct TextFingerprint {
    len: usize,
    head: u64,
    tail: u64,
}

impl TextFingerprint {
    fn of(text: &str) -> Self {
        let bytes = text.as_bytes();
        Self {
            len: bytes.len(),
            head: pack_edge(bytes.iter().copied().take(8)),
            tail: pack_edge(bytes.iter().rev().copied().take(8)),
        }
    }
}

fn pack_edge(iter: impl Iterator<Item = u8>) -> u64 {
    let mut value = 0u64;
    for (index, byte) in iter.enumerate() {
        value |= (byte as u64) << (index * 8);
    }
    value
}

#[cfg(test)]
mod tagger_tests {
    use super::{Analyzer, Mecab, TextFingerprint};
    use crate::{MecabError, Morpheme, Result};
    use std::cell::Cell;

    struct CountingAnalyzer {
        calls: Cell<usize>,
    }

    impl CountingAnalyzer {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl Analyzer for CountingAnalyzer {
        fn analyze(&self, sentence: &str) -> Result<Vec<(String, String)>> {
            self.calls.set(self.calls.get() + 1);
            if sentence.is_empty() {
                return Ok(Vec::new());
            }
            Ok(sentence
                .split_whitespace()
                .map(|word| (word.to_string(), "NNG,*,T,*,*,*,*,*".to_string()))
                .collect())
        }
    }

    struct FailingAnalyzer;

    impl Analyzer for FailingAnalyzer {
        fn analyze(&self, _sentence: &str) -> Result<Vec<(String, String)>> {
            Err(MecabError::Analysis("lattice is empty".to_string()))
        }
    }

    struct BrokenFeatureAnalyzer;

    impl Analyzer for BrokenFeatureAnalyzer {
        fn analyze(&self, sentence: &str) -> Result<Vec<(String, String)>> {
            Ok(vec![(sentence.to_string(), "NNG,*,T".to_string())])
        }
    }

    struct UnknownWordAnalyzer;

    impl Analyzer for UnknownWordAnalyzer {
        fn analyze(&self, _sentence: &str) -> Result<Vec<(String, String)>> {
            Ok(vec![
                ("까비".to_string(), "*,*,F,까비,*,*,*,*".to_string()),
                ("는".to_string(), "JX,*,T,는,*,*,*,*".to_string()),
            ])
        }
    }

    #[test]
    fn repeated_views_hit_the_cache() {
        let mecab = Mecab::with_analyzer(CountingAnalyzer::new());
        assert_eq!(mecab.nouns("사과 배", true).unwrap(), vec!["사과", "배"]);
        assert_eq!(
            mecab.pos("사과 배", false).unwrap(),
            vec![Morpheme::new("사과", "NNG"), Morpheme::new("배", "NNG")]
        );
        assert_eq!(mecab.morphs("사과 배", true).unwrap().len(), 2);
        assert_eq!(mecab.analyzer().calls.get(), 1);

        mecab.clear_cache();
        mecab.parse("사과 배").unwrap();
        assert_eq!(mecab.analyzer().calls.get(), 2);
    }

    #[test]
    fn cache_evicts_least_recently_used() {
        let mecab = Mecab::with_analyzer(CountingAnalyzer::new()).with_cache_capacity(2);
        mecab.parse("가").unwrap();
        mecab.parse("나").unwrap();
        mecab.parse("가").unwrap();
        mecab.parse("다").unwrap();
        assert_eq!(mecab.cached_sentences(), vec!["다", "가"]);
        assert_eq!(mecab.analyzer().calls.get(), 3);
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let mecab = Mecab::with_analyzer(CountingAnalyzer::new()).with_cache_capacity(0);
        mecab.parse("가").unwrap();
        mecab.parse("가").unwrap();
        assert_eq!(mecab.analyzer().calls.get(), 2);
        assert!(mecab.cached_sentences().is_empty());
    }

    #[test]
    fn empty_sentence_yields_no_tokens() {
        let mecab = Mecab::with_analyzer(CountingAnalyzer::new());
        assert!(mecab.parse("").unwrap().is_empty());
        assert!(mecab.nouns("", false).unwrap().is_empty());
    }

    #[test]
    fn analysis_failure_is_propagated_and_not_cached() {
        let mecab = Mecab::with_analyzer(FailingAnalyzer);
        let error = mecab.pos("문장", true).expect_err("analysis must fail");
        assert!(matches!(error, MecabError::Analysis(message) if message == "lattice is empty"));
        assert!(mecab.cached_sentences().is_empty());
    }

    #[test]
    fn malformed_feature_surfaces_immediately() {
        let mecab = Mecab::with_analyzer(BrokenFeatureAnalyzer);
        let error = mecab.parse("상황").expect_err("three fields");
        assert!(matches!(error, MecabError::MalformedFeature { .. }));
    }

    #[test]
    fn token_without_pos_keeps_the_sentence() {
        let mecab = Mecab::with_analyzer(UnknownWordAnalyzer);
        assert_eq!(mecab.morphs("까비는", true).unwrap(), vec!["까비", "는"]);
        assert_eq!(
            mecab.pos("까비는", true).unwrap(),
            vec![Morpheme::new("까비", "*"), Morpheme::new("는", "JX")]
        );
        assert!(mecab.nouns("까비는", true).unwrap().is_empty());
    }

    #[test]
    fn borrowed_and_boxed_analyzers_work() {
        let analyzer = CountingAnalyzer::new();
        let borrowed = Mecab::with_analyzer(&analyzer);
        borrowed.parse("하나").unwrap();
        assert_eq!(analyzer.calls.get(), 1);

        let boxed: Mecab<Box<dyn Analyzer>> =
            Mecab::with_analyzer(Box::new(CountingAnalyzer::new()));
        assert_eq!(boxed.morphs("둘 셋", true).unwrap(), vec!["둘", "셋"]);
    }

    #[test]
    fn fingerprint_distinguishes_edges() {
        let left = TextFingerprint::of("형태소 분석기");
        let right = TextFingerprint::of("형태소 분석을");
        assert_ne!(left, right);
        assert_eq!(left, TextFingerprint::of("형태소 분석기"));
    }
}
