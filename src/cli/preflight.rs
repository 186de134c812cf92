//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::{Result, TubeqaError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Listing caption tracks only talks to YouTube.
    Tracks,
    /// Indexing and searching need embeddings.
    Index,
    /// Answering needs embeddings and chat completions.
    Ask,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Tracks => {}
        Operation::Index | Operation::Ask => {
            check_api_key(std::env::var("OPENAI_API_KEY").ok().as_deref())?;
        }
    }
    Ok(())
}

/// Check that an OpenAI API key is configured.
fn check_api_key(key: Option<&str>) -> Result<()> {
    match key {
        Some(key) if !key.trim().is_empty() => Ok(()),
        Some(_) => Err(TubeqaError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        None => Err(TubeqaError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tracks_no_requirements() {
        assert!(check(Operation::Tracks).is_ok());
    }

    #[test]
    fn test_check_api_key() {
        assert!(check_api_key(Some("sk-test")).is_ok());
        assert!(matches!(check_api_key(Some("  ")), Err(TubeqaError::Config(_))));
        assert!(matches!(check_api_key(None), Err(TubeqaError::Config(_))));
    }
}
