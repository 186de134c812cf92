//! Turning chunks into a searchable index.

use super::VectorIndex;
use crate::chunking::Chunk;
use crate::embedding::Embedder;
use crate::error::{Result, TubeqaError};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Embeds chunks and builds a [`VectorIndex`] from them.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Embed every chunk and build the index.
    ///
    /// Either all chunks are embedded and indexed, or an error is returned and
    /// nothing is built.
    #[instrument(skip(self, chunks), fields(chunks = chunks.len()))]
    pub async fn build(&self, video_id: &str, language: &str, chunks: Vec<Chunk>) -> Result<VectorIndex> {
        if chunks.is_empty() {
            return Err(TubeqaError::InvalidInput(format!(
                "Transcript for {} produced no chunks to index",
                video_id
            )));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        debug!("Embedding {} chunks", texts.len());

        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(into_embedding_error)?;

        let index = VectorIndex::build(video_id, language, chunks, embeddings)?;
        info!("Built index {} with {} chunks", index.id(), index.len());
        Ok(index)
    }
}

/// Report any embedder failure as an embedding service error.
pub(crate) fn into_embedding_error(err: TubeqaError) -> TubeqaError {
    match err {
        TubeqaError::Embedding(_) => err,
        other => TubeqaError::Embedding(other.to_string()),
    }
}
