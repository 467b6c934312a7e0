//! Constants shared by the feature codec, the dictionary compiler and the
//! MeCab C API binding.

/// Number of comma-separated fields in a mecab-ko-dic feature string.
pub const FEATURE_FIELD_COUNT: usize = 8;
/// Number of comma-separated fields in a user dictionary row.
pub const DICTIONARY_FIELD_COUNT: usize = 12;
/// Literal marking an absent field in feature strings and dictionary rows.
pub const ABSENT_FIELD: &str = "*";

/// Separator between atomic morphemes inside an expression field.
pub const EXPRESSION_ELEMENT_SEPARATOR: char = '+';
/// Separator between `morpheme/tag/semantic` inside an expression element.
pub const EXPRESSION_FIELD_SEPARATOR: char = '/';
/// Separator used when rendering joined `surface/tag` pairs.
pub const JOIN_SEPARATOR: char = '/';

/// Jongseong code for a syllable with a trailing consonant.
pub const JONGSEONG_PRESENT_CODE: &str = "T";
/// Jongseong code for a syllable without a trailing consonant.
pub const JONGSEONG_ABSENT_CODE: &str = "F";

/// Default part-of-speech tag for user dictionary entries (proper noun).
pub const DEFAULT_ENTRY_POS: &str = "NNP";
/// Prefix shared by every noun-family tag (`NNG`, `NNP`, `NNB`, `NR`, `NP`).
pub const NOUN_TAG_PREFIX: char = 'N';
/// Extension of user dictionary files inside a directory.
pub const DEFAULT_DICTIONARY_EXTENSION: &str = "csv";

/// First code point of the modern Hangul syllable block (`가`).
pub const HANGUL_SYLLABLE_BASE: u32 = 0xAC00;
/// Last code point of the modern Hangul syllable block (`힣`).
pub const HANGUL_SYLLABLE_LAST: u32 = 0xD7A3;
/// Number of trailing consonant slots per syllable, including "none".
pub const JONGSEONG_COUNT: u32 = 28;

/// Default capacity of the per-tagger parse cache.
pub const DEFAULT_PARSE_CACHE_CAPACITY: usize = 128;

/// Node status: regular dictionary word.
pub const MECAB_NOR_NODE: u8 = 0;
/// Node status: unknown word.
pub const MECAB_UNK_NODE: u8 = 1;
/// Node status: beginning of sentence.
pub const MECAB_BOS_NODE: u8 = 2;
/// Node status: end of sentence.
pub const MECAB_EOS_NODE: u8 = 3;
/// Node status: end of N-best enumeration.
pub const MECAB_EON_NODE: u8 = 4;

/// Lattice request flag: one best result.
pub const MECAB_ONE_BEST: i32 = 1;
/// Lattice request flag: let the lattice own a copy of the sentence.
pub const MECAB_ALLOCATE_SENTENCE: i32 = 64;

/// Dictionary type id: system dictionary.
pub const MECAB_SYS_DIC: i32 = 0;
/// Dictionary type id: user dictionary.
pub const MECAB_USR_DIC: i32 = 1;
/// Dictionary type id: unknown-word dictionary.
pub const MECAB_UNK_DIC: i32 = 2;

/// Environment variable: explicit `libmecab` path.
pub const ENV_LIBRARY_PATH: &str = "MECAB_LIBRARY_PATH";
/// Environment variable: explicit system dictionary directory.
pub const ENV_DICTIONARY_PATH: &str = "MECAB_DIC_PATH";
/// Environment variable: MeCab resource file, also read by MeCab itself.
pub const ENV_RC_PATH: &str = "MECABRC";
