//! Splitting transcript text into overlapping, bounded chunks for retrieval.

mod recursive;

pub use recursive::TextSplitter;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Split boundaries tried in order: paragraph, line, sentence, word, character.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Metadata key holding the video id a chunk came from.
pub const SOURCE_KEY: &str = "source";

/// Metadata key holding the transcript language description.
pub const LANGUAGE_KEY: &str = "language";

/// A bounded piece of transcript text used as one retrieval unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub content: String,
    /// Byte offset of `content` in the text it was split from.
    pub offset: usize,
    /// Key-value metadata shared by all chunks of one source.
    pub metadata: BTreeMap<String, String>,
}

impl Chunk {
    pub fn new(content: String, offset: usize) -> Self {
        Self {
            content,
            offset,
            metadata: BTreeMap::new(),
        }
    }

    /// Byte offset one past the end of this chunk in the source text.
    pub fn end(&self) -> usize {
        self.offset + self.content.len()
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// The video id this chunk was taken from, if recorded.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }
}

/// Which neighbouring piece keeps a separator after splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeepSeparator {
    /// `"a. b"` splits into `"a"` and `". b"`.
    Start,
    /// `"a. b"` splits into `"a. "` and `"b"`.
    #[default]
    End,
}

impl std::str::FromStr for KeepSeparator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(KeepSeparator::Start),
            "end" => Ok(KeepSeparator::End),
            _ => Err(format!("Unknown separator placement: {}", s)),
        }
    }
}
