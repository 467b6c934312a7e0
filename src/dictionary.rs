//! User dictionary entries in the 12-column CSV layout consumed by the
//! mecab-ko-dic build step:
//!
//! ```text
//! surface,left_id,right_id,cost,pos,semantic,jongseong,reading,type,start_pos,end_pos,expression
//! 까비,,,,NNP,*,F,까비,*,*,*,*
//! ```
//!
//! Rows are positional and header-less. The three placeholder columns are
//! filled in by the dictionary builder and are normally empty here.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv_core::{ReadFieldResult, WriteResult};
use regex::Regex;

use crate::constants::{
    ABSENT_FIELD, DEFAULT_DICTIONARY_EXTENSION, DEFAULT_ENTRY_POS, DICTIONARY_FIELD_COUNT,
};
use crate::error::{MecabError, Result};
use crate::feature::Jongseong;
use crate::hangul::has_jongseong;

/// One user dictionary row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DictionaryEntry {
    /// Surface form.
    pub surface: String,
    /// Left context id, right context id and cost columns, kept verbatim.
    pub placeholders: [String; 3],
    /// Part-of-speech tag.
    pub pos: String,
    /// Semantic class.
    pub semantic: String,
    /// Trailing consonant flag of the surface.
    pub jongseong: Jongseong,
    /// Reading.
    pub reading: String,
    /// Morphological type.
    pub morph_type: String,
    /// Tag of the first morpheme.
    pub start_pos: String,
    /// Tag of the last morpheme.
    pub end_pos: String,
    /// Expression.
    pub expression: String,
}

impl DictionaryEntry {
    /// Creates an entry with every column at its default: `NNP`, `*`, `T`,
    /// reading equal to the surface.
    ///
    /// The jongseong flag is not computed; use [`make_entry`] for that.
    pub fn new(surface: impl Into<String>) -> Self {
        let surface = surface.into();
        Self {
            reading: surface.clone(),
            surface,
            placeholders: Default::default(),
            pos: DEFAULT_ENTRY_POS.to_string(),
            semantic: ABSENT_FIELD.to_string(),
            jongseong: Jongseong::Present,
            morph_type: ABSENT_FIELD.to_string(),
            start_pos: ABSENT_FIELD.to_string(),
            end_pos: ABSENT_FIELD.to_string(),
            expression: ABSENT_FIELD.to_string(),
        }
    }

    /// Sets the part-of-speech tag.
    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos = pos.into();
        self
    }

    /// Sets the semantic class.
    pub fn with_semantic(mut self, semantic: impl Into<String>) -> Self {
        self.semantic = semantic.into();
        self
    }

    /// Sets the reading.
    pub fn with_reading(mut self, reading: impl Into<String>) -> Self {
        self.reading = reading.into();
        self
    }

    /// Sets the jongseong flag.
    pub fn with_jongseong(mut self, jongseong: Jongseong) -> Self {
        self.jongseong = jongseong;
        self
    }

    /// Sets type, start tag, end tag and expression of a compound entry.
    pub fn with_analysis(
        mut self,
        morph_type: impl Into<String>,
        start_pos: impl Into<String>,
        end_pos: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        self.morph_type = morph_type.into();
        self.start_pos = start_pos.into();
        self.end_pos = end_pos.into();
        self.expression = expression.into();
        self
    }

    /// Maps a row positionally onto the 12 columns.
    ///
    /// Errors carry `line = 0`; row readers fill in the real location.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        if fields.len() != DICTIONARY_FIELD_COUNT {
            return Err(MecabError::malformed_entry(
                PathBuf::new(),
                0,
                format!(
                    "expected {DICTIONARY_FIELD_COUNT} fields, found {}",
                    fields.len()
                ),
            ));
        }
        let field = |index: usize| fields[index].as_ref().to_string();
        let jongseong = Jongseong::from_code(fields[6].as_ref()).ok_or_else(|| {
            MecabError::malformed_entry(
                PathBuf::new(),
                0,
                format!("unknown jongseong code {:?}", fields[6].as_ref()),
            )
        })?;

        Ok(Self {
            surface: field(0),
            placeholders: [field(1), field(2), field(3)],
            pos: field(4),
            semantic: field(5),
            jongseong,
            reading: field(7),
            morph_type: field(8),
            start_pos: field(9),
            end_pos: field(10),
            expression: field(11),
        })
    }

    /// Column values in file order.
    pub fn to_fields(&self) -> [&str; DICTIONARY_FIELD_COUNT] {
        [
            &self.surface,
            &self.placeholders[0],
            &self.placeholders[1],
            &self.placeholders[2],
            &self.pos,
            &self.semantic,
            self.jongseong.code(),
            &self.reading,
            &self.morph_type,
            &self.start_pos,
            &self.end_pos,
            &self.expression,
        ]
    }
}

/// Builds an entry with the jongseong flag computed from `surface`.
///
/// `reading` defaults to the surface.
///
/// # Errors
/// [`MecabError::InvalidCharacter`] if `surface` does not end in a Hangul
/// syllable.
pub fn make_entry(
    surface: &str,
    pos: &str,
    semantic: &str,
    reading: Option<&str>,
) -> Result<DictionaryEntry> {
    let jongseong = Jongseong::from(has_jongseong(surface)?);
    Ok(DictionaryEntry::new(surface)
        .with_pos(pos)
        .with_semantic(semantic)
        .with_reading(reading.unwrap_or(surface))
        .with_jongseong(jongseong))
}

/// Options for [`UserDictionary::load_with_options`].
#[derive(Debug, Clone, Default)]
pub struct DictionaryLoadOptions {
    /// File names inside a directory that count as dictionary files.
    /// `None` accepts any `*.csv` file (case-insensitive).
    pub file_pattern: Option<Regex>,
}

impl DictionaryLoadOptions {
    /// Uses a custom regex for dictionary file names.
    pub fn with_file_pattern(mut self, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|error| {
            MecabError::InvalidArgument(format!("invalid dictionary file pattern: {error}"))
        })?;
        self.file_pattern = Some(pattern);
        Ok(self)
    }

    fn accepts(&self, name: &str) -> bool {
        match &self.file_pattern {
            Some(pattern) => pattern.is_match(name),
            None => Path::new(name)
                .extension()
                .and_then(|extension| extension.to_str())
                .map_or(false, |extension| {
                    extension.eq_ignore_ascii_case(DEFAULT_DICTIONARY_EXTENSION)
                }),
        }
    }
}

/// Result of [`UserDictionary::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Rows were written.
    Written {
        /// Destination file.
        path: PathBuf,
        /// Number of rows.
        entries: usize,
    },
    /// The dictionary was empty; no file was created.
    Empty,
}

/// Ordered collection of user dictionary entries.
///
/// Order is significant: the dictionary builder lets later rows override
/// earlier ones with the same surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDictionary {
    entries: Vec<DictionaryEntry>,
}

impl UserDictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads entries from a CSV file or a directory of CSV files.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_options(path, &DictionaryLoadOptions::default())
    }

    /// Loads with explicit options.
    ///
    /// Directory contents are read in file name order.
    pub fn load_with_options(
        path: impl AsRef<Path>,
        options: &DictionaryLoadOptions,
    ) -> Result<Self> {
        let mut dictionary = Self::new();
        dictionary.extend_from_path_with_options(path, options)?;
        Ok(dictionary)
    }

    /// Appends the entries found at `path`.
    pub fn extend_from_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        self.extend_from_path_with_options(path, &DictionaryLoadOptions::default())
    }

    fn extend_from_path_with_options(
        &mut self,
        path: impl AsRef<Path>,
        options: &DictionaryLoadOptions,
    ) -> Result<usize> {
        let path = path.as_ref();
        let before = self.entries.len();

        if fs::metadata(path)?.is_dir() {
            for file in dictionary_files(path, options)? {
                self.extend_from_file(&file)?;
            }
        } else {
            self.extend_from_file(path)?;
        }

        let loaded = self.entries.len() - before;
        log::info!(
            "loaded {loaded} user dictionary entries from {}",
            path.display()
        );
        Ok(loaded)
    }

    fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let file = fs::File::open(path)?;
        let entries = read_entries(file, path)?;
        log::debug!("read {} rows from {}", entries.len(), path.display());
        self.entries.extend(entries);
        Ok(())
    }

    /// Reads entries from any reader; `source` is used in error messages.
    pub fn read_from<R: Read>(reader: R, source: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            entries: read_entries(reader, source.as_ref())?,
        })
    }

    /// Adds an entry built by [`make_entry`] and returns it.
    pub fn add_entry(
        &mut self,
        surface: &str,
        pos: &str,
        semantic: &str,
        reading: Option<&str>,
    ) -> Result<&DictionaryEntry> {
        let entry = make_entry(surface, pos, semantic, reading)?;
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Adds a proper noun (`NNP`, semantic `*`, reading = surface).
    pub fn add_proper_noun(&mut self, surface: &str) -> Result<&DictionaryEntry> {
        self.add_entry(surface, DEFAULT_ENTRY_POS, ABSENT_FIELD, None)
    }

    /// Appends a prepared entry as-is.
    pub fn push(&mut self, entry: DictionaryEntry) {
        self.entries.push(entry);
    }

    /// Appends every entry of `other` after the current ones.
    pub fn merge(&mut self, other: UserDictionary) {
        self.entries.extend(other.entries);
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, DictionaryEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every entry as CSV rows.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        write_entries(writer, &self.entries)
    }

    /// Saves the dictionary to `path`.
    ///
    /// An empty dictionary leaves the file system untouched and returns
    /// [`SaveOutcome::Empty`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<SaveOutcome> {
        let path = path.as_ref();
        if self.entries.is_empty() {
            log::warn!("user dictionary is empty, nothing to save");
            return Ok(SaveOutcome::Empty);
        }

        let file = fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;

        log::info!(
            "saved {} user dictionary entries to {}",
            self.entries.len(),
            path.display()
        );
        Ok(SaveOutcome::Written {
            path: path.to_path_buf(),
            entries: self.entries.len(),
        })
    }
}

impl Extend<DictionaryEntry> for UserDictionary {
    fn extend<I: IntoIterator<Item = DictionaryEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<DictionaryEntry> for UserDictionary {
    fn from_iter<I: IntoIterator<Item = DictionaryEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for UserDictionary {
    type Item = DictionaryEntry;
    type IntoIter = std::vec::IntoIter<DictionaryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a UserDictionary {
    type Item = &'a DictionaryEntry;
    type IntoIter = std::slice::Iter<'a, DictionaryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn dictionary_files(directory: &Path, options: &DictionaryLoadOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dir_entry in fs::read_dir(directory)? {
        let dir_entry = dir_entry?;
        let path = dir_entry.path();
        let name = dir_entry.file_name();
        let matches = name.to_str().map_or(false, |name| options.accepts(name));
        if matches && path.is_file() {
            files.push(path);
        } else {
            log::debug!("skipping {}", path.display());
        }
    }
    files.sort();
    Ok(files)
}

fn read_entries<R: Read>(mut reader: R, source: &Path) -> Result<Vec<DictionaryEntry>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    let bytes = buf.strip_prefix("\u{feff}".as_bytes()).unwrap_or(&buf);

    parse_rows(bytes, source)?
        .into_iter()
        .map(|(line, fields)| {
            DictionaryEntry::from_fields(&fields).map_err(|error| match error {
                MecabError::MalformedEntry { reason, .. } => {
                    MecabError::malformed_entry(source, line, reason)
                }
                other => other,
            })
        })
        .collect()
}

/// Splits CSV bytes into rows of fields, each tagged with the 1-based line
/// on which it starts. csv-core drops blank lines before a record begins.
fn parse_rows(input: &[u8], source: &Path) -> Result<Vec<(usize, Vec<String>)>> {
    let mut rows = Vec::new();
    let mut reader = csv_core::Reader::new();
    let mut output = [0; 4096];
    let mut field = Vec::new();
    let mut fields = Vec::new();
    let mut lines = LineCounter::new(input);
    let mut offset = 0;
    let mut record_start = 0;

    loop {
        let (result, nin, nout) = reader.read_field(&input[offset..], &mut output);
        offset += nin;
        field.extend_from_slice(&output[..nout]);
        match result {
            ReadFieldResult::InputEmpty | ReadFieldResult::OutputFull => continue,
            ReadFieldResult::Field { record_end } => {
                let value = String::from_utf8(std::mem::take(&mut field)).map_err(|_| {
                    let line = lines.row_start(record_start);
                    MecabError::malformed_entry(source, line, "field is not valid UTF-8")
                })?;
                fields.push(value);
                if record_end {
                    let line = lines.row_start(record_start);
                    rows.push((line, std::mem::take(&mut fields)));
                    record_start = offset;
                }
            }
            ReadFieldResult::End => break,
        }
    }

    Ok(rows)
}

/// Physical line numbers for byte offsets that only move forward.
struct LineCounter<'a> {
    input: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
        }
    }

    /// Line of the first byte at or after `start` that is not a line
    /// terminator.
    fn row_start(&mut self, start: usize) -> usize {
        let skipped = self.input[start..]
            .iter()
            .take_while(|&&byte| byte == b'\r' || byte == b'\n')
            .count();
        let target = (start + skipped).max(self.offset);
        self.line += self.input[self.offset..target]
            .iter()
            .filter(|&&byte| byte == b'\n')
            .count();
        self.offset = target;
        self.line
    }
}

fn write_entries<W: Write>(mut writer: W, entries: &[DictionaryEntry]) -> Result<()> {
    for entry in entries {
        for (index, value) in entry.to_fields().iter().enumerate() {
            if index > 0 {
                writer.write_all(b",")?;
            }
            if !value.is_empty() {
                quote_csv_cell(&mut writer, value.as_bytes())?;
            }
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

fn quote_csv_cell<W: Write>(mut writer: W, mut data: &[u8]) -> std::io::Result<()> {
    let mut output = [0; 4096];
    let mut csv_writer = csv_core::Writer::new();
    loop {
        let (result, nin, nout) = csv_writer.field(data, &mut output);
        writer.write_all(&output[..nout])?;
        data = &data[nin..];
        if result == WriteResult::InputEmpty {
            break;
        }
    }
    let (_, nout) = csv_writer.finish(&mut output);
    writer.write_all(&output[..nout])
}
