// Embedding model — word → dense vector lookup, built once from a text
// model file and immutable afterwards.
//
// Storage is split the way the file is: `vectors` holds one row per data
// line (so row indexes always line up with the file), and `word_index` maps
// each word to the row of its first occurrence. Duplicate words in the file
// consume a row but get no index entry; their rows stay as empty
// placeholders that nothing points to. Lookups therefore always land on a
// full vector of exactly `dimension` components.

mod loader;

pub use loader::{load, probe};

use std::collections::HashMap;

use crate::error::LssError;

/// What the first line of a model file reveals: either a `vocab dimension`
/// header, or a headerless data line whose field count implies the dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelShape {
    pub vocab: crate::config::VocabSize,
    pub dimension: usize,
    pub has_header: bool,
}

/// In-memory embedding model. Read-only after load; safe to share across
/// parallel group-scoring tasks without locking.
#[derive(Debug)]
pub struct EmbeddingModel {
    pub(crate) dimension: usize,
    pub(crate) vectors: Vec<Vec<f64>>,
    pub(crate) word_index: HashMap<String, usize>,
}

impl EmbeddingModel {
    /// Build a model from in-memory (word, vector) pairs — the programmatic
    /// counterpart of `load`. File semantics apply: every pair consumes a
    /// row index, first occurrence of a word wins, later duplicates leave a
    /// placeholder row. Fails if any vector's length differs from
    /// `dimension`.
    pub fn from_pairs<I>(dimension: usize, pairs: I) -> Result<Self, LssError>
    where
        I: IntoIterator<Item = (String, Vec<f64>)>,
    {
        let mut vectors = Vec::new();
        let mut word_index = HashMap::new();

        for (word, vector) in pairs {
            let row = vectors.len();
            if vector.len() != dimension {
                return Err(LssError::ModelFormat {
                    line: row as u64 + 1,
                    reason: format!(
                        "vector for {word:?} has {} components, expected {dimension}",
                        vector.len()
                    ),
                });
            }
            if word_index.contains_key(&word) {
                vectors.push(Vec::new());
            } else {
                word_index.insert(word, row);
                vectors.push(vector);
            }
        }

        Ok(EmbeddingModel {
            dimension,
            vectors,
            word_index,
        })
    }

    /// Vector dimension shared by every word in the model.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of distinct words with a retrievable vector.
    pub fn vocab_len(&self) -> usize {
        self.word_index.len()
    }

    /// Number of rows loaded, including duplicate placeholders — equals the
    /// number of data lines in the source file.
    pub fn row_count(&self) -> usize {
        self.vectors.len()
    }

    /// Look up a word's vector. Returns the first-occurrence vector, or
    /// None for words outside the vocabulary.
    pub fn vector(&self, word: &str) -> Option<&[f64]> {
        self.word_index
            .get(word)
            .map(|&row| self.vectors[row].as_slice())
    }
}
