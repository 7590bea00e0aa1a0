// Text preparation — sentence chunking and normalization for topic modeling.

pub mod chunker;
pub mod lemmatizer;
pub mod stopwords;

use std::fmt;

use serde::{Deserialize, Serialize};

use self::lemmatizer::Lemmatizer;
use self::stopwords::{remove_stopwords, StopwordSet};

/// Stable identifier of a chunk: its position in the chunker's output.
///
/// Every later stage refers to chunks by id, so filtering a chunk out of
/// model fitting never shifts the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(pub usize);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A group of consecutive sentences from the input, verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
}

/// A chunk after stopword removal and lemmatization. May be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedChunk {
    pub chunk_id: ChunkId,
    pub text: String,
}

impl ProcessedChunk {
    /// Whether this chunk has anything left to model.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Stopword removal followed by lemmatization.
pub struct TextNormalizer<'a> {
    stopwords: &'a StopwordSet,
    lemmatizer: &'a Lemmatizer,
}

impl<'a> TextNormalizer<'a> {
    pub fn new(stopwords: &'a StopwordSet, lemmatizer: &'a Lemmatizer) -> Self {
        Self {
            stopwords,
            lemmatizer,
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        self.lemmatizer
            .lemmatize_text(&remove_stopwords(text, self.stopwords))
    }

    pub fn process(&self, chunk: &Chunk) -> ProcessedChunk {
        ProcessedChunk {
            chunk_id: chunk.id,
            text: self.normalize(&chunk.text),
        }
    }
}
