//! RAG (Retrieval-Augmented Generation) over an indexed transcript.
//!
//! A [`Retriever`] finds the chunks closest to a question and an
//! [`AnswerComposer`] turns them into a prompt for a [`ChatModel`].

mod chat;
pub mod context;
mod response;

pub use chat::OpenAIChatModel;
pub use context::{format_context_for_prompt, Retriever, DEFAULT_K};
pub use response::{Answer, AnswerComposer};

use crate::error::Result;
use async_trait::async_trait;

/// A text completion model that answers a single prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send `prompt` as one user message and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
