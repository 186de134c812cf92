//! Answer generation from retrieved context.

use super::{format_context_for_prompt, ChatModel, Retriever};
use crate::config::Prompts;
use crate::error::{Result, TubeqaError};
use crate::vector_store::{ScoredChunk, VectorIndex};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Retrieves context for a question and asks the chat model to answer from it.
pub struct AnswerComposer {
    retriever: Retriever,
    model: Arc<dyn ChatModel>,
    prompts: Prompts,
}

impl AnswerComposer {
    pub fn new(retriever: Retriever, model: Arc<dyn ChatModel>) -> Self {
        Self {
            retriever,
            model,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer `question` from the chunks of `index`.
    #[instrument(skip(self, index), fields(video_id = %index.video_id()))]
    pub async fn answer(&self, index: &VectorIndex, question: &str) -> Result<Answer> {
        info!("Answering question: {}", question);

        let sources = self.retriever.retrieve(index, question).await?;
        let prompt = self.compose_prompt(question, &sources);

        let answer = self.model.complete(&prompt).await.map_err(|e| match e {
            TubeqaError::ModelCompletion(_) => e,
            other => TubeqaError::ModelCompletion(other.to_string()),
        })?;

        debug!("Generated answer from {} chunks", sources.len());
        Ok(Answer { answer, sources })
    }

    /// Render the answer prompt for `question` over `sources`.
    pub fn compose_prompt(&self, question: &str, sources: &[ScoredChunk]) -> String {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), format_context_for_prompt(sources));
        vars.insert("question".to_string(), question.to_string());

        self.prompts.render_with_custom(&self.prompts.answer.template, &vars)
    }
}

/// The model's answer together with the chunks it was given.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<ScoredChunk>,
}
