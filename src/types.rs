use std::fmt;

use crate::constants::{
    ABSENT_FIELD, EXPRESSION_ELEMENT_SEPARATOR, EXPRESSION_FIELD_SEPARATOR, JOIN_SEPARATOR, NOUN_TAG_PREFIX,
};
use crate::error::{MecabError, Result};
use crate::feature::Feature;

/// One analyzer node: surface text plus its decoded feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Surface text as it appears in the sentence.
    pub surface: String,
    /// Decoded feature record.
    pub feature: Feature,
}

impl Token {
    /// Creates a token from already decoded parts.
    pub fn new(surface: impl Into<String>, feature: Feature) -> Self {
        Self {
            surface: surface.into(),
            feature,
        }
    }

    /// Creates a token from the engine's raw `(surface, feature)` pair.
    pub fn from_raw(surface: impl Into<String>, feature: &str) -> Result<Self> {
        Ok(Self::new(surface, Feature::decode(feature)?))
    }

    /// Part-of-speech tag of the whole token, `*` when the engine left it
    /// absent.
    pub fn pos(&self) -> &str {
        self.feature.pos.as_deref().unwrap_or(ABSENT_FIELD)
    }

    /// The token as a single `(surface, pos)` morpheme, compound or not.
    pub fn as_morpheme(&self) -> Morpheme {
        Morpheme::new(self.surface.clone(), self.pos())
    }

    /// Splits the token into its atomic morphemes.
    ///
    /// Tokens without an expression yield themselves. Otherwise every
    /// `+`-separated element of the expression becomes one morpheme, in the
    /// order the engine wrote them; the semantic field of each triple is
    /// dropped. The engine may rewrite surfaces inside the expression
    /// (`합니다` -> `하` + `ᄇ니다`), so no attempt is made to re-align them
    /// with [`Self::surface`].
    ///
    /// # Errors
    /// [`MecabError::MalformedExpression`] if an element lacks a tag.
    pub fn expand(&self) -> Result<Vec<Morpheme>> {
        let Some(expression) = self.feature.expression.as_deref() else {
            return Ok(vec![self.as_morpheme()]);
        };

        expression
            .split(EXPRESSION_ELEMENT_SEPARATOR)
            .map(|element| {
                let mut fields = element.split(EXPRESSION_FIELD_SEPARATOR);
                match (fields.next(), fields.next()) {
                    (Some(surface), Some(tag)) => Ok(Morpheme::new(surface, tag)),
                    _ => Err(MecabError::MalformedExpression {
                        expression: expression.to_string(),
                        element: element.to_string(),
                    }),
                }
            })
            .collect()
    }
}

/// `(surface, tag)` pair produced by tagging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Morpheme {
    /// Surface text.
    pub surface: String,
    /// Part-of-speech tag.
    pub tag: String,
}

impl Morpheme {
    /// Creates a morpheme.
    pub fn new(surface: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            tag: tag.into(),
        }
    }

    /// Whether the tag belongs to the noun family (`N*`).
    pub fn is_noun(&self) -> bool {
        self.tag.starts_with(NOUN_TAG_PREFIX)
    }

    /// Renders as `surface/tag`.
    pub fn joined(&self) -> String {
        self.to_string()
    }

    /// Borrows as a tuple.
    pub fn as_pair(&self) -> (&str, &str) {
        (&self.surface, &self.tag)
    }
}

impl fmt::Display for Morpheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.surface, JOIN_SEPARATOR, self.tag)
    }
}

impl From<Morpheme> for (String, String) {
    fn from(value: Morpheme) -> Self {
        (value.surface, value.tag)
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for Morpheme {
    fn from((surface, tag): (S, T)) -> Self {
        Self::new(surface, tag)
    }
}
