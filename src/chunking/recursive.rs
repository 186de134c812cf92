//! Recursive character splitting.
//!
//! Text is cut on the coarsest separator it contains. Pieces that fit are merged
//! greedily into chunks; pieces that don't are split again with the next
//! separator down, ending at single characters. All bookkeeping is done on byte
//! ranges of the input so every chunk knows exactly where it came from.

use super::{Chunk, KeepSeparator, DEFAULT_SEPARATORS};
use crate::config::ChunkingSettings;
use crate::error::{Result, TubeqaError};
use std::collections::BTreeMap;
use std::ops::Range;

/// Splits text into chunks of at most `chunk_size` characters with up to
/// `chunk_overlap` characters shared between neighbours.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
    keep_separator: KeepSeparator,
}

impl TextSplitter {
    /// Create a splitter with the default separators.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(TubeqaError::InvalidInput("chunk size must be positive".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(TubeqaError::InvalidInput(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            keep_separator: KeepSeparator::default(),
        })
    }

    /// Create a splitter from configuration.
    pub fn from_settings(settings: &ChunkingSettings) -> Result<Self> {
        Ok(Self::new(settings.chunk_size, settings.chunk_overlap)?
            .with_separators(settings.separators.clone())
            .with_keep_separator(settings.keep_separator))
    }

    /// Replace the separator list (coarsest first). A character-level `""`
    /// is appended when missing so every piece can still be cut to size.
    pub fn with_separators(mut self, mut separators: Vec<String>) -> Self {
        if !separators.iter().any(String::is_empty) {
            separators.push(String::new());
        }
        self.separators = separators;
        self
    }

    pub fn with_keep_separator(mut self, keep_separator: KeepSeparator) -> Self {
        self.keep_separator = keep_separator;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split text into chunks without metadata.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        self.create_chunks(text, &BTreeMap::new())
    }

    /// Split text into chunks, copying `metadata` onto each one.
    pub fn create_chunks(&self, text: &str, metadata: &BTreeMap<String, String>) -> Vec<Chunk> {
        self.split_range(text, 0..text.len(), &self.separators)
            .into_iter()
            .filter_map(|range| trim_range(text, range))
            .map(|range| Chunk {
                content: text[range.clone()].to_string(),
                offset: range.start,
                metadata: metadata.clone(),
            })
            .collect()
    }

    fn split_range(&self, text: &str, range: Range<usize>, separators: &[String]) -> Vec<Range<usize>> {
        let piece = &text[range.clone()];

        // Pick the first separator present; "" always matches.
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut finer: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if piece.contains(candidate.as_str()) {
                separator = candidate.as_str();
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut fitting: Vec<Range<usize>> = Vec::new();

        for split in split_on(text, range, separator, self.keep_separator) {
            if char_len(text, &split) < self.chunk_size {
                fitting.push(split);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge(text, &fitting, separator));
                fitting.clear();
            }

            if finer.is_empty() {
                chunks.push(split);
            } else {
                chunks.extend(self.split_range(text, split, finer));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge(text, &fitting, separator));
        }

        chunks
    }

    /// Greedily merge contiguous pieces into chunks. Each new chunk opens with
    /// the overlap tail of the one before it.
    fn merge(&self, text: &str, splits: &[Range<usize>], separator: &str) -> Vec<Range<usize>> {
        let mut merged = Vec::new();
        let mut current: Option<Range<usize>> = None;

        for split in splits {
            let len = char_len(text, split);
            current = match current.take() {
                Some(chunk) if char_len(text, &chunk) + len > self.chunk_size => {
                    let start = self
                        .overlap_start(text, &chunk, len, separator.is_empty())
                        .unwrap_or(split.start);
                    merged.push(chunk);
                    Some(start..split.end)
                }
                Some(chunk) => Some(chunk.start..split.end),
                None => Some(split.clone()),
            };
        }

        merged.extend(current);
        merged
    }

    /// Start of the longest tail of `chunk` that trims to at most
    /// `chunk_overlap` characters and leaves room for `next_len` more.
    ///
    /// Tails begin on a word; with `any_char` they may begin on any character.
    fn overlap_start(&self, text: &str, chunk: &Range<usize>, next_len: usize, any_char: bool) -> Option<usize> {
        if self.chunk_overlap == 0 {
            return None;
        }

        let piece = &text[chunk.clone()];
        let first = piece.len() - piece.trim_start().len();
        let mut after_space = false;

        for (i, c) in piece.char_indices() {
            let boundary = i > first && !c.is_whitespace() && (any_char || after_space);
            after_space = c.is_whitespace();
            if !boundary {
                continue;
            }

            let tail = &piece[i..];
            if tail.trim_end().chars().count() <= self.chunk_overlap
                && tail.chars().count() + next_len <= self.chunk_size
            {
                return Some(chunk.start + i);
            }
        }

        None
    }
}

/// Cut `range` of `text` at every occurrence of `separator`, keeping the
/// separator on one side. Empty pieces are dropped.
fn split_on(text: &str, range: Range<usize>, separator: &str, keep: KeepSeparator) -> Vec<Range<usize>> {
    let base = range.start;
    let piece = &text[range];

    if separator.is_empty() {
        return piece
            .char_indices()
            .map(|(i, c)| base + i..base + i + c.len_utf8())
            .collect();
    }

    let mut splits = Vec::new();
    let mut cursor = 0;
    for (idx, _) in piece.match_indices(separator) {
        let cut = match keep {
            KeepSeparator::Start => idx,
            KeepSeparator::End => idx + separator.len(),
        };
        splits.push(cursor..cut);
        cursor = cut;
    }
    splits.push(cursor..piece.len());

    splits
        .into_iter()
        .filter(|r| r.start < r.end)
        .map(|r| base + r.start..base + r.end)
        .collect()
}

fn char_len(text: &str, range: &Range<usize>) -> usize {
    text[range.clone()].chars().count()
}

/// Shrink a range to exclude surrounding whitespace; `None` if nothing is left.
fn trim_range(text: &str, range: Range<usize>) -> Option<Range<usize>> {
    let piece = &text[range.clone()];
    let leading = piece.len() - piece.trim_start().len();
    let trimmed = piece.trim();
    if trimmed.is_empty() {
        return None;
    }
    let start = range.start + leading;
    Some(start..start + trimmed.len())
}
