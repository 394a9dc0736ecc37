use rand::Rng;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Built-in catalog, one `WORD|definition` entry per line.
pub const EMBEDDED_CATALOG: &str = "\
APPLE|A round fruit with red or green skin and white flesh
BEACH|A sandy or pebbly shore, especially by the sea
CLOUD|A visible mass of water droplets in the atmosphere
DANCE|Move rhythmically to music
EAGLE|A large bird of prey with a massive hooked bill
";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("word catalog is empty")]
    Empty,
    #[error("catalog entry {index} has an empty word")]
    EmptyWord { index: usize },
    #[error("catalog entry {index} ('{word}') must contain letters only")]
    NonLetterWord { index: usize, word: String },
    #[error("catalog entry {index} ('{word}') has an empty definition")]
    EmptyDefinition { index: usize, word: String },
    #[error("line {line}: expected 'WORD|definition'")]
    Malformed { line: usize },
    #[error("failed to read catalog: {0}")]
    Io(String),
}

/// A word the player can be asked to find, with the clue shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub definition: String,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
        }
    }

    /// Length of the word in characters.
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }
}

/// Validated, immutable list of target words.
///
/// Every entry is checked on construction, so selection can never hand out an
/// empty word or a missing definition.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<WordEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<WordEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| validate_entry(index, entry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn embedded() -> Result<Self, CatalogError> {
        load_catalog_from_str(EMBEDDED_CATALOG)
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick an entry uniformly at random.
    pub fn select_target<R: Rng + ?Sized>(&self, rng: &mut R) -> &WordEntry {
        let index = rng.random_range(0..self.entries.len());
        &self.entries[index]
    }
}

fn validate_entry(index: usize, entry: WordEntry) -> Result<WordEntry, CatalogError> {
    let word = entry.word.trim().to_uppercase();
    let definition = entry.definition.trim().to_string();
    if word.is_empty() {
        return Err(CatalogError::EmptyWord { index });
    }
    if !word.chars().all(char::is_alphabetic) {
        return Err(CatalogError::NonLetterWord { index, word });
    }
    if definition.is_empty() {
        return Err(CatalogError::EmptyDefinition { index, word });
    }
    Ok(WordEntry { word, definition })
}

pub fn load_catalog_from_str(data: &str) -> Result<Catalog, CatalogError> {
    let mut entries = Vec::new();
    for (i, line) in data.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((word, definition)) = line.split_once('|') else {
            return Err(CatalogError::Malformed { line: i + 1 });
        };
        entries.push(WordEntry::new(word, definition));
    }
    Catalog::new(entries)
}

pub fn load_catalog_from_file<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let data = fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
    load_catalog_from_str(&data)
}
