//! Error types for tubeqa.

use thiserror::Error;

/// Library-level error type for tubeqa operations.
#[derive(Error, Debug)]
pub enum TubeqaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No transcripts are available for video {video_id} (captions disabled or missing)")]
    TranscriptsUnavailable { video_id: String },

    #[error("Video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },

    #[error("Transcript fetch failed: {0}")]
    TranscriptFetch(String),

    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("No index available. Index a video first.")]
    IndexNotReady,

    #[error("Model completion failed: {0}")]
    ModelCompletion(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TubeqaError {
    /// Whether the error came from an upstream service rather than local state or input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            TubeqaError::TranscriptFetch(_)
                | TubeqaError::Embedding(_)
                | TubeqaError::ModelCompletion(_)
                | TubeqaError::Http(_)
        )
    }
}

/// Result type alias for tubeqa operations.
pub type Result<T> = std::result::Result<T, TubeqaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message_names_video() {
        let err = TubeqaError::TranscriptsUnavailable {
            video_id: "abc12345678".to_string(),
        };
        assert!(err.to_string().contains("abc12345678"));
    }

    #[test]
    fn test_upstream_classification() {
        assert!(TubeqaError::Embedding("boom".into()).is_upstream());
        assert!(TubeqaError::ModelCompletion("boom".into()).is_upstream());
        assert!(!TubeqaError::IndexNotReady.is_upstream());
        assert!(!TubeqaError::InvalidInput("x".into()).is_upstream());
    }
}
