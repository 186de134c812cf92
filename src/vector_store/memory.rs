//! Flat in-memory vector index with exact cosine search.

use super::{cosine_distance, IndexInfo, ScoredChunk};
use crate::chunking::Chunk;
use crate::error::{Result, TubeqaError};
use chrono::{DateTime, Utc};
use uuid::Uuid;

struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Vector index for the chunks of one video.
pub struct VectorIndex {
    id: Uuid,
    video_id: String,
    language: String,
    built_at: DateTime<Utc>,
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index from chunks and their embeddings, paired by position.
    ///
    /// Fails without producing an index if the counts differ, any vector has a
    /// different length than the first, or there is nothing to index.
    pub fn build(
        video_id: &str,
        language: &str,
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(TubeqaError::InvalidInput(format!(
                "Transcript for {} produced no chunks to index",
                video_id
            )));
        }

        if chunks.len() != embeddings.len() {
            return Err(TubeqaError::Embedding(format!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dimensions = embeddings[0].len();
        if dimensions == 0 {
            return Err(TubeqaError::Embedding("Embedding service returned empty vectors".to_string()));
        }
        if let Some(bad) = embeddings.iter().position(|e| e.len() != dimensions) {
            return Err(TubeqaError::Embedding(format!(
                "Embedding {} has {} dimensions, expected {}",
                bad,
                embeddings[bad].len(),
                dimensions
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            video_id: video_id.to_string(),
            language: language.to_string(),
            built_at: Utc::now(),
            dimensions,
            entries,
        })
    }

    /// Return the `k` chunks closest to `query`, nearest first.
    ///
    /// Equal distances keep transcript order. A `k` above the chunk count
    /// returns every chunk ranked.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dimensions {
            return Err(TubeqaError::Embedding(format!(
                "Query embedding has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut ranked: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (position, cosine_distance(query, &entry.embedding)))
            .collect();

        // Stable sort, so ties stay in transcript order.
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(k);

        Ok(ranked
            .into_iter()
            .map(|(position, distance)| ScoredChunk {
                chunk: self.entries[position].chunk.clone(),
                distance,
                position,
            })
            .collect())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chunks in transcript order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|e| &e.chunk)
    }

    pub fn info(&self) -> IndexInfo {
        IndexInfo {
            id: self.id,
            video_id: self.video_id.clone(),
            language: self.language.clone(),
            chunk_count: self.entries.len(),
            dimensions: self.dimensions,
            built_at: self.built_at,
        }
    }
}
