//! In-process vector index over transcript chunks.
//!
//! One [`VectorIndex`] holds the chunks of one video. It is built in a single
//! step from a complete set of chunks and embeddings and never modified after.

mod indexer;
mod memory;

pub use indexer::Indexer;
pub(crate) use indexer::into_embedding_error;
pub use memory::VectorIndex;

use crate::chunking::Chunk;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A retrieved chunk with its distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The matched chunk.
    pub chunk: Chunk,
    /// Cosine distance to the query (lower is closer).
    pub distance: f32,
    /// Position of the chunk in the transcript.
    pub position: usize,
}

impl ScoredChunk {
    /// Cosine similarity (higher is closer).
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}

/// Summary information about a built index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfo {
    pub id: Uuid,
    pub video_id: String,
    /// Language the transcript was indexed in (e.g. "en" or "de->en").
    pub language: String,
    pub chunk_count: usize,
    pub dimensions: usize,
    pub built_at: DateTime<Utc>,
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Cosine distance, `1 - cosine_similarity`, in `[0, 2]`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_distance_bounds() {
        let a = vec![3.0, 4.0];
        assert!(cosine_distance(&a, &a).abs() < 0.001);
        assert!((cosine_distance(&a, &[-3.0, -4.0]) - 2.0).abs() < 0.001);
        // Zero vectors are treated as orthogonal to everything.
        assert!((cosine_distance(&a, &[0.0, 0.0]) - 1.0).abs() < 0.001);
    }
}
