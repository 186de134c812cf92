//! Transcript acquisition.
//!
//! A [`TranscriptProvider`] lists and fetches caption tracks; [`acquire_transcript`]
//! decides which track to use and whether to ask for a translation.

mod models;
mod selection;
mod video_ref;
mod youtube;

pub use models::{FetchedTranscript, LanguageUsed, TranscriptSegment, TranscriptTrack};
pub use selection::{acquire_transcript, select_track, TrackSelection};
pub use video_ref::{app_link, extract_video_id, parse_video_ref};
pub use youtube::YoutubeTranscripts;

use crate::error::Result;
use async_trait::async_trait;

/// A source of caption tracks for videos.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Every caption track available for a video, in the source's order.
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<TranscriptTrack>>;

    /// Fetch a track as published.
    async fn fetch(&self, video_id: &str, track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>>;

    /// Fetch a track machine translated into `language`.
    async fn fetch_translated(
        &self,
        video_id: &str,
        track: &TranscriptTrack,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>>;
}
