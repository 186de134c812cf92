//! Data models for transcripts and caption tracks.

use serde::{Deserialize, Serialize};

/// One timed piece of spoken text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Spoken text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }

    /// End time in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Metadata for one caption track available on a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTrack {
    /// Language code, e.g. "en" or "pt-BR".
    pub language_code: String,
    /// Human readable language name.
    pub language: String,
    /// Whether the track was generated by speech recognition.
    pub is_generated: bool,
    /// Whether the source can translate this track.
    pub is_translatable: bool,
    /// Where the provider fetches this track from.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub url: String,
}

impl TranscriptTrack {
    /// Whether this track is in `language`, ignoring region subtags.
    pub fn is_language(&self, language: &str) -> bool {
        let code = self.language_code.to_lowercase();
        let wanted = language.to_lowercase();
        code == wanted || code.starts_with(&format!("{}-", wanted))
    }

    pub fn kind(&self) -> &'static str {
        if self.is_generated {
            "generated"
        } else {
            "manual"
        }
    }
}

/// Which language the fetched segments are in and how they got there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LanguageUsed {
    /// The track was fetched as published.
    Native { code: String },
    /// The track was machine translated by the source.
    Translated { from: String, to: String },
}

impl std::fmt::Display for LanguageUsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LanguageUsed::Native { code } => write!(f, "{}", code),
            LanguageUsed::Translated { from, to } => write!(f, "{}->{}", from, to),
        }
    }
}

/// Segments for a video together with the language they were fetched in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedTranscript {
    pub video_id: String,
    pub segments: Vec<TranscriptSegment>,
    pub language: LanguageUsed,
}

impl FetchedTranscript {
    /// All segment texts joined by single spaces.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Total duration in seconds, from the end of the last segment.
    pub fn duration_seconds(&self) -> f64 {
        self.segments.last().map(|s| s.end()).unwrap_or(0.0)
    }
}
