//! Configuration module for tubeqa.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts};
pub use settings::{
    AnswerSettings, ChunkingSettings, EmbeddingSettings, GeneralSettings, PromptSettings,
    RetrievalSettings, ServerSettings, Settings, TranscriptSettings,
};
