use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{MECAB_SYS_DIC, MECAB_UNK_DIC, MECAB_USR_DIC};
use crate::native::{cstr_to_string, MecabDictionaryInfoRaw};

/// Role of a dictionary loaded by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictionaryKind {
    /// System dictionary (`sys.dic`).
    System,
    /// User dictionary (`-u`).
    User,
    /// Unknown-word dictionary (`unk.dic`).
    Unknown,
    /// Type id not known to this crate.
    Other(i32),
}

impl From<i32> for DictionaryKind {
    fn from(value: i32) -> Self {
        match value {
            MECAB_SYS_DIC => Self::System,
            MECAB_USR_DIC => Self::User,
            MECAB_UNK_DIC => Self::Unknown,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for DictionaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => f.write_str("system"),
            Self::User => f.write_str("user"),
            Self::Unknown => f.write_str("unknown"),
            Self::Other(value) => write!(f, "type {value}"),
        }
    }
}

/// Metadata of one dictionary loaded by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryInfo {
    /// Path of the compiled dictionary file.
    pub filename: PathBuf,
    /// Character set the dictionary was compiled with.
    pub charset: String,
    /// Number of entries.
    pub size: u32,
    /// Dictionary role.
    pub kind: DictionaryKind,
    /// Left context attribute count.
    pub lsize: u32,
    /// Right context attribute count.
    pub rsize: u32,
    /// Dictionary format version.
    pub version: u16,
}

impl DictionaryInfo {
    /// Directory holding the compiled dictionary file.
    pub fn directory(&self) -> Option<&Path> {
        self.filename.parent()
    }

    pub(crate) fn from_raw(raw: &MecabDictionaryInfoRaw) -> Self {
        Self {
            filename: PathBuf::from(cstr_to_string(raw.filename)),
            charset: cstr_to_string(raw.charset),
            size: raw.size,
            kind: DictionaryKind::from(raw.kind),
            lsize: raw.lsize,
            rsize: raw.rsize,
            version: raw.version,
        }
    }
}
