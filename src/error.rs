use std::path::PathBuf;

/// Error type returned by mecab-ko public APIs.
#[derive(Debug, thiserror::Error)]
pub enum MecabError {
    /// Dynamic library could not be loaded.
    #[error("failed to load library: {0}")]
    LibraryLoad(String),
    /// Required symbol could not be resolved from the library.
    #[error("failed to load symbol: {0}")]
    SymbolLoad(String),
    /// Rust string contained an interior `NUL` byte for C interop.
    #[error("string contains NUL byte: {0}")]
    NulByte(#[from] std::ffi::NulError),
    /// User-provided arguments were invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Error reported by the MeCab C API outside of sentence analysis.
    #[error("mecab api error: {0}")]
    Api(String),
    /// The engine failed to analyze a sentence.
    #[error("analysis failed: {0}")]
    Analysis(String),
    /// A feature string did not follow the 8-field layout.
    #[error("malformed feature {feature:?}: {reason}")]
    MalformedFeature {
        /// Raw feature string as emitted by the engine.
        feature: String,
        /// What was wrong with it.
        reason: String,
    },
    /// An expression element had fewer than two `/`-separated fields.
    #[error("malformed expression {expression:?}: element {element:?} needs at least `morpheme/tag`")]
    MalformedExpression {
        /// Whole expression field.
        expression: String,
        /// Offending `+`-separated element.
        element: String,
    },
    /// Jongseong computation was asked for text not ending in a Hangul syllable.
    #[error("last character of {text:?} is not a Hangul syllable")]
    InvalidCharacter {
        /// Input text.
        text: String,
        /// Last character, `None` for empty text.
        ch: Option<char>,
    },
    /// A user dictionary row could not be mapped onto the 12 entry fields.
    #[error("malformed dictionary entry at {}:{line}: {reason}", .path.display())]
    MalformedEntry {
        /// File (or pseudo-path) the row was read from.
        path: PathBuf,
        /// 1-based physical line on which the row starts.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },
    /// Dictionary file I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MecabError {
    pub(crate) fn malformed_feature(feature: &str, reason: impl Into<String>) -> Self {
        Self::MalformedFeature {
            feature: feature.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_entry(
        path: impl Into<PathBuf>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedEntry {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = MecabError> = std::result::Result<T, E>;
