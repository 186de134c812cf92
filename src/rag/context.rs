//! Context retrieval for answers.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{into_embedding_error, ScoredChunk, VectorIndex};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of chunks retrieved when no `k` is given.
pub const DEFAULT_K: usize = 4;

/// Finds the chunks of an index closest to a question.
///
/// Must use the same embedder the index was built with.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            k: DEFAULT_K,
        }
    }

    /// Set the default number of chunks to retrieve.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Retrieve the default number of chunks for `question`.
    pub async fn retrieve(&self, index: &VectorIndex, question: &str) -> Result<Vec<ScoredChunk>> {
        self.retrieve_k(index, question, self.k).await
    }

    /// Retrieve the `k` chunks nearest to `question`, closest first.
    #[instrument(skip(self, index), fields(video_id = %index.video_id()))]
    pub async fn retrieve_k(&self, index: &VectorIndex, question: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query = self
            .embedder
            .embed(question)
            .await
            .map_err(into_embedding_error)?;

        let results = index.search(&query, k)?;
        debug!("Retrieved {} of {} chunks", results.len(), index.len());
        Ok(results)
    }
}

/// Join retrieved chunk contents, in retrieval order, into one context block.
pub fn format_context_for_prompt(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
