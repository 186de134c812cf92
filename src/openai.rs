//! Shared OpenAI client construction.

use crate::error::{Result, TubeqaError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Embedding and chat calls both go through this limit.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Build a client whose API key comes from `OPENAI_API_KEY`.
pub fn create_client() -> Result<Client<OpenAIConfig>> {
    let http = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| TubeqaError::Config(format!("cannot build OpenAI HTTP client: {}", e)))?;

    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http))
}
