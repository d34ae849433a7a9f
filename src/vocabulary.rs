use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

static WORDS_DIR: Dir = include_dir!("src/words");

const BUILTIN: &str = "stantyper.json";

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("word list {name} not found")]
    Missing { name: String },
    #[error("reading word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("word list is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("word list {0} has no words")]
    Empty(String),
}

/// Words a match is played with
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Vocabulary {
    pub name: String,
    pub words: Vec<String>,
}

impl Vocabulary {
    /// The word list shipped with the game
    pub fn builtin() -> Result<Self, VocabularyError> {
        let file = WORDS_DIR
            .get_file(BUILTIN)
            .ok_or_else(|| VocabularyError::Missing {
                name: BUILTIN.to_string(),
            })?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| VocabularyError::Missing {
                name: BUILTIN.to_string(),
            })?;
        Self::from_json(contents)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            return Self::from_json(&contents);
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        Self::from_words(name, contents.split_whitespace().map(str::to_string))
    }

    pub fn from_json(contents: &str) -> Result<Self, VocabularyError> {
        let vocab: Vocabulary = serde_json::from_str(contents)?;
        Self::from_words(vocab.name, vocab.words)
    }

    /// Blank entries are dropped and inner whitespace is not allowed, since
    /// the input line never contains spaces
    pub fn from_words<I>(name: String, words: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty() && !w.contains(char::is_whitespace))
            .collect();

        if words.is_empty() {
            return Err(VocabularyError::Empty(name));
        }
        Ok(Self { name, words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
