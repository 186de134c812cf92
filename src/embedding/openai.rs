//! Embeddings through the OpenAI API.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{Result, TubeqaError};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Inputs per embeddings request.
const MAX_INPUTS_PER_REQUEST: usize = 100;

pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: u32,
}

impl OpenAIEmbedder {
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: settings.model.clone(),
            dimensions: settings.dimensions,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One request. Vectors come back in input order.
    async fn request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(inputs.to_vec()))
            .dimensions(self.dimensions)
            .build()
            .map_err(|e| TubeqaError::Embedding(format!("invalid request: {}", e)))?;

        let mut data = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| TubeqaError::Embedding(e.to_string()))?
            .data;

        if data.len() != inputs.len() {
            return Err(TubeqaError::Embedding(format!(
                "asked for {} vectors, received {}",
                inputs.len(),
                data.len()
            )));
        }

        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| TubeqaError::Embedding("no vector returned".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len(), model = %self.model))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_INPUTS_PER_REQUEST) {
            vectors.extend(self.request(batch).await?);
            debug!(done = vectors.len(), total = texts.len(), "embedded batch");
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions as usize
    }
}
