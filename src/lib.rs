#![deny(missing_docs)]

//! Korean part-of-speech tagging on top of MeCab and mecab-ko-dic.
//!
//! The crate decodes the 8-field feature strings that mecab-ko-dic attaches
//! to every node, splits compound and inflected tokens into their atomic
//! morphemes, and compiles user dictionary rows in the 12-column format the
//! dictionary build step consumes.
//!
//! ## Quick Start
//! ```no_run
//! use mecab_ko::Mecab;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mecab = Mecab::new()?;
//!     for morpheme in mecab.pos("아버지가방에들어가신다.", false)? {
//!         println!("{}/{}", morpheme.surface, morpheme.tag);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Engine Setup
//! `libmecab` is loaded at runtime, so the crate builds without MeCab
//! installed.
//!
//! 1. Automatic discovery via [`Mecab::new`]
//!   - `MECAB_LIBRARY_PATH`, then common install locations.
//!   - `MECAB_DIC_PATH`, then common `mecab-ko-dic` locations.
//! 2. Explicit setup via [`Mecab::from_config`]
//!
//! ```no_run
//! use mecab_ko::{Mecab, MecabConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MecabConfig::default()
//!         .with_library_path("/usr/local/lib/libmecab.so")
//!         .with_dictionary_path("/usr/local/lib/mecab/dic/mecab-ko-dic");
//!     let mecab = Mecab::from_config(config)?;
//!     let _nouns = mecab.nouns("형태소 분석 예시", true)?;
//!     Ok(())
//! }
//! ```
//!
//! Any [`Analyzer`] can stand in for the engine through
//! [`Mecab::with_analyzer`], and the functions in [`format`] work on tokens
//! directly.
//!
//! ## User Dictionaries
//! ```no_run
//! use mecab_ko::UserDictionary;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut dictionary = UserDictionary::load("user-dic")?;
//!     dictionary.add_entry("까비", "NNP", "*", None)?;
//!     dictionary.save("user-dic/nnp.csv")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//! - `MECAB_LIBRARY_PATH`: explicit `libmecab` path.
//! - `MECAB_DIC_PATH`: explicit system dictionary directory.
//! - `MECABRC`: resource file passed as `-r`.

mod config;
mod constants;
mod dictionary;
mod discovery;
mod error;
mod feature;
pub mod format;
mod hangul;
mod model;
mod native;
mod runtime;
mod tagger;
mod types;

pub use config::MecabConfig;
pub use constants::*;
pub use dictionary::{
    make_entry, DictionaryEntry, DictionaryLoadOptions, SaveOutcome, UserDictionary,
};
pub use error::{MecabError, Result};
pub use feature::{Feature, Jongseong};
pub use hangul::{has_jongseong, is_hangul_syllable, jongseong_index};
pub use model::{DictionaryInfo, DictionaryKind};
pub use runtime::{MecabLibrary, NativeTagger};
pub use tagger::{Analyzer, Mecab};
pub use types::{Morpheme, Token};

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;
