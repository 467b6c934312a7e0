//! Codec for the 8-field feature string mecab-ko-dic attaches to every node.
//!
//! ```text
//! <pos>,<semantic>,<jongseong>,<reading>,<type>,<start_pos>,<end_pos>,<expression>
//! XSA+EF,*,F,합니다,Inflect,XSA,EF,하/XSA/*+ᄇ니다/EF/*
//! ```
//!
//! A literal `*` marks an absent field. The translation between `*` and
//! `None` happens here and nowhere else.

use std::fmt;
use std::str::FromStr;

use crate::constants::{
    ABSENT_FIELD, FEATURE_FIELD_COUNT, JONGSEONG_ABSENT_CODE, JONGSEONG_PRESENT_CODE,
};
use crate::error::{MecabError, Result};

/// Whether a word ends in a trailing consonant (jongseong).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Jongseong {
    /// Last syllable has a trailing consonant (`T`).
    Present,
    /// Last syllable has no trailing consonant (`F`).
    Absent,
    /// Not recorded (`*`), e.g. for symbols and foreign words.
    #[default]
    Unknown,
}

impl Jongseong {
    /// Parses the dictionary code (`T`, `F` or `*`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            JONGSEONG_PRESENT_CODE => Some(Self::Present),
            JONGSEONG_ABSENT_CODE => Some(Self::Absent),
            ABSENT_FIELD => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Dictionary code for this value.
    pub fn code(self) -> &'static str {
        match self {
            Self::Present => JONGSEONG_PRESENT_CODE,
            Self::Absent => JONGSEONG_ABSENT_CODE,
            Self::Unknown => ABSENT_FIELD,
        }
    }

    /// `Some(true)`/`Some(false)` when known.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Present => Some(true),
            Self::Absent => Some(false),
            Self::Unknown => None,
        }
    }
}

impl From<bool> for Jongseong {
    fn from(value: bool) -> Self {
        if value {
            Self::Present
        } else {
            Self::Absent
        }
    }
}

impl fmt::Display for Jongseong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Decoded per-token metadata.
///
/// Optional fields hold `None` where the engine wrote `*`; an empty string
/// is kept as `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Feature {
    /// Part-of-speech tag, `+`-joined for inflected forms (`XSA+EF`).
    pub pos: Option<String>,
    /// Semantic subclass (`인명`, `지명`, ...).
    pub semantic: Option<String>,
    /// Trailing consonant flag of the surface form.
    pub jongseong: Jongseong,
    /// Reading of the surface form.
    pub reading: Option<String>,
    /// Morphological type (`Inflect`, `Compound`, `Preanalysis`).
    pub morph_type: Option<String>,
    /// Tag of the first atomic morpheme.
    pub start_pos: Option<String>,
    /// Tag of the last atomic morpheme.
    pub end_pos: Option<String>,
    /// `morpheme/tag/semantic` triples joined by `+`.
    pub expression: Option<String>,
}

impl Feature {
    /// Creates a feature with only a part-of-speech tag set.
    pub fn new(pos: impl Into<String>) -> Self {
        Self {
            pos: Some(pos.into()),
            semantic: None,
            jongseong: Jongseong::Unknown,
            reading: None,
            morph_type: None,
            start_pos: None,
            end_pos: None,
            expression: None,
        }
    }

    /// Sets the expression field.
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Sets the reading field.
    pub fn with_reading(mut self, reading: impl Into<String>) -> Self {
        self.reading = Some(reading.into());
        self
    }

    /// Sets the jongseong flag.
    pub fn with_jongseong(mut self, jongseong: Jongseong) -> Self {
        self.jongseong = jongseong;
        self
    }

    /// Decodes a raw feature string.
    ///
    /// # Errors
    /// [`MecabError::MalformedFeature`] if the string does not split into
    /// exactly eight fields.
    ///
    /// A jongseong code other than `T` or `F` decodes as
    /// [`Jongseong::Unknown`].
    pub fn decode(feature: &str) -> Result<Self> {
        let values: Vec<&str> = feature.split(',').collect();
        if values.len() != FEATURE_FIELD_COUNT {
            return Err(MecabError::malformed_feature(
                feature,
                format!(
                    "expected {FEATURE_FIELD_COUNT} comma-separated fields, found {}",
                    values.len()
                ),
            ));
        }

        Ok(Self {
            pos: optional(values[0]),
            semantic: optional(values[1]),
            jongseong: Jongseong::from_code(values[2]).unwrap_or_default(),
            reading: optional(values[3]),
            morph_type: optional(values[4]),
            start_pos: optional(values[5]),
            end_pos: optional(values[6]),
            expression: optional(values[7]),
        })
    }

    /// Encodes back into the engine's comma-separated form.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Whether the token decomposes into several atomic morphemes.
    pub fn is_compound(&self) -> bool {
        self.expression.is_some()
    }
}

fn optional(value: &str) -> Option<String> {
    if value == ABSENT_FIELD {
        None
    } else {
        Some(value.to_string())
    }
}

fn write_optional(f: &mut fmt::Formatter<'_>, value: &Option<String>) -> fmt::Result {
    f.write_str(value.as_deref().unwrap_or(ABSENT_FIELD))
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_optional(f, &self.pos)?;
        f.write_str(",")?;
        write_optional(f, &self.semantic)?;
        write!(f, ",{},", self.jongseong)?;
        write_optional(f, &self.reading)?;
        f.write_str(",")?;
        write_optional(f, &self.morph_type)?;
        f.write_str(",")?;
        write_optional(f, &self.start_pos)?;
        f.write_str(",")?;
        write_optional(f, &self.end_pos)?;
        f.write_str(",")?;
        write_optional(f, &self.expression)
    }
}

impl FromStr for Feature {
    type Err = MecabError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod feature_tests {
    use super::{Feature, Jongseong};
    use crate::MecabError;

    const INFLECTED: &str = "XSA+EF,*,F,합니다,Inflect,XSA,EF,하/XSA/*+ᄇ니다/EF/*";

    #[test]
    fn decodes_inflected_form() {
        let feature = Feature::decode(INFLECTED).unwrap();
        assert_eq!(feature.pos.as_deref(), Some("XSA+EF"));
        assert_eq!(feature.semantic, None);
        assert_eq!(feature.jongseong, Jongseong::Absent);
        assert_eq!(feature.reading.as_deref(), Some("합니다"));
        assert_eq!(feature.morph_type.as_deref(), Some("Inflect"));
        assert_eq!(feature.start_pos.as_deref(), Some("XSA"));
        assert_eq!(feature.end_pos.as_deref(), Some("EF"));
        assert_eq!(feature.expression.as_deref(), Some("하/XSA/*+ᄇ니다/EF/*"));
        assert!(feature.is_compound());
    }

    #[test]
    fn sentinel_fields_become_none() {
        let feature: Feature = "SF,*,*,*,*,*,*,*".parse().unwrap();
        assert_eq!(feature, Feature::new("SF"));
        assert_eq!(feature.jongseong.as_bool(), None);
        assert!(!feature.is_compound());
    }

    #[test]
    fn empty_fields_are_not_absent() {
        let feature = Feature::decode("NNG,,T,,*,*,*,*").unwrap();
        assert_eq!(feature.semantic.as_deref(), Some(""));
        assert_eq!(feature.reading.as_deref(), Some(""));
        assert_eq!(feature.encode(), "NNG,,T,,*,*,*,*");
    }

    #[test]
    fn encode_inverts_decode() {
        for raw in [
            INFLECTED,
            "NNG,*,T,상황,*,*,*,*",
            "NNP,지명,T,서울,*,*,*,*",
            "NNG+JKG,*,F,정책의,Compound,NNG,JKG,정책/NNG/*+의/JKG/*",
        ] {
            let feature = Feature::decode(raw).unwrap();
            assert_eq!(feature.encode(), raw);
            assert_eq!(Feature::decode(&feature.encode()).unwrap(), feature);
        }
    }

    #[test]
    fn rejects_wrong_arity() {
        for raw in ["", "NNG", "NNG,*,T,상황,*,*,*", "NNG,*,T,상황,*,*,*,*,*"] {
            let error = Feature::decode(raw).expect_err("arity must be checked");
            assert!(matches!(error, MecabError::MalformedFeature { .. }), "{raw:?}");
        }
    }

    #[test]
    fn all_absent_fields_round_trip() {
        let raw = "*,*,*,*,*,*,*,*";
        let feature = Feature::decode(raw).unwrap();
        assert_eq!(feature.pos, None);
        assert_eq!(feature.semantic, None);
        assert_eq!(feature.jongseong, Jongseong::Unknown);
        assert_eq!(feature.reading, None);
        assert_eq!(feature.expression, None);
        assert_eq!(feature.encode(), raw);

        let feature = Feature::decode("*,*,F,까비,*,*,*,*").unwrap();
        assert_eq!(feature.pos, None);
        assert_eq!(feature.jongseong, Jongseong::Absent);
        assert_eq!(feature.encode(), "*,*,F,까비,*,*,*,*");
    }

    #[test]
    fn unrecognised_jongseong_code_is_unknown() {
        let feature = Feature::decode("NNG,*,X,상황,*,*,*,*").unwrap();
        assert_eq!(feature.pos.as_deref(), Some("NNG"));
        assert_eq!(feature.jongseong, Jongseong::Unknown);
        assert_eq!(feature.reading.as_deref(), Some("상황"));
    }

    #[test]
    fn jongseong_codes() {
        assert_eq!(Jongseong::from_code("T"), Some(Jongseong::Present));
        assert_eq!(Jongseong::from_code("F"), Some(Jongseong::Absent));
        assert_eq!(Jongseong::from_code("*"), Some(Jongseong::Unknown));
        assert_eq!(Jongseong::from_code("t"), None);
        assert_eq!(Jongseong::from(true).code(), "T");
        assert_eq!(Jongseong::from(false).to_string(), "F");
        assert_eq!(Jongseong::default(), Jongseong::Unknown);
    }
}
