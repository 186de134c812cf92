//! Choosing which caption track to use and fetching it.

use super::{FetchedTranscript, LanguageUsed, TranscriptProvider, TranscriptSegment, TranscriptTrack};
use crate::error::{Result, TubeqaError};
use tracing::{info, instrument, warn};

/// The track picked for a video, by priority class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSelection<'a> {
    /// A track already in the target language (manual or generated).
    Target(&'a TranscriptTrack),
    /// The first manually created track in another language.
    Manual(&'a TranscriptTrack),
    /// The first generated track in another language.
    Generated(&'a TranscriptTrack),
}

impl<'a> TrackSelection<'a> {
    pub fn track(&self) -> &'a TranscriptTrack {
        match self {
            TrackSelection::Target(t) | TrackSelection::Manual(t) | TrackSelection::Generated(t) => t,
        }
    }
}

/// Pick a track in one pass over `tracks`.
///
/// Priority: target language (manual before generated), then the first manual
/// track, then the first generated track, all in enumeration order.
pub fn select_track<'a>(tracks: &'a [TranscriptTrack], target_language: &str) -> Option<TrackSelection<'a>> {
    let mut target_manual = None;
    let mut target_generated = None;
    let mut manual = None;
    let mut generated = None;

    for track in tracks {
        let slot = match (track.is_language(target_language), track.is_generated) {
            (true, false) => &mut target_manual,
            (true, true) => &mut target_generated,
            (false, false) => &mut manual,
            (false, true) => &mut generated,
        };
        if slot.is_none() {
            *slot = Some(track);
        }
    }

    target_manual
        .or(target_generated)
        .map(TrackSelection::Target)
        .or_else(|| manual.map(TrackSelection::Manual))
        .or_else(|| generated.map(TrackSelection::Generated))
}

/// Fetch the transcript of `video_id`, ending up in `target_language` when the
/// source allows it.
///
/// A failed translation falls back to the chosen track in its own language.
#[instrument(skip(provider))]
pub async fn acquire_transcript(
    provider: &dyn TranscriptProvider,
    video_id: &str,
    target_language: &str,
) -> Result<FetchedTranscript> {
    let tracks = provider.list_tracks(video_id).await?;

    let selection = select_track(&tracks, target_language).ok_or_else(|| {
        TubeqaError::TranscriptsUnavailable {
            video_id: video_id.to_string(),
        }
    })?;

    let track = selection.track();
    info!("Selected {} track {} for {}", track.kind(), track.language_code, video_id);

    let (segments, language) = match selection {
        TrackSelection::Target(track) => (
            provider.fetch(video_id, track).await?,
            LanguageUsed::Native {
                code: track.language_code.clone(),
            },
        ),
        TrackSelection::Manual(track) | TrackSelection::Generated(track) if track.is_translatable => {
            match translate_and_fetch(provider, video_id, track, target_language).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    warn!(
                        "Translating {} to {} failed, using the original track: {}",
                        track.language_code, target_language, e
                    );
                    fetch_native(provider, video_id, track).await?
                }
            }
        }
        TrackSelection::Manual(track) | TrackSelection::Generated(track) => {
            fetch_native(provider, video_id, track).await?
        }
    };

    Ok(FetchedTranscript {
        video_id: video_id.to_string(),
        segments,
        language,
    })
}

async fn translate_and_fetch(
    provider: &dyn TranscriptProvider,
    video_id: &str,
    track: &TranscriptTrack,
    target_language: &str,
) -> Result<(Vec<TranscriptSegment>, LanguageUsed)> {
    let segments = provider.fetch_translated(video_id, track, target_language).await?;
    Ok((
        segments,
        LanguageUsed::Translated {
            from: track.language_code.clone(),
            to: target_language.to_string(),
        },
    ))
}

async fn fetch_native(
    provider: &dyn TranscriptProvider,
    video_id: &str,
    track: &TranscriptTrack,
) -> Result<(Vec<TranscriptSegment>, LanguageUsed)> {
    let segments = provider.fetch(video_id, track).await?;
    Ok((
        segments,
        LanguageUsed::Native {
            code: track.language_code.clone(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str, generated: bool, translatable: bool) -> TranscriptTrack {
        TranscriptTrack {
            language_code: code.to_string(),
            language: code.to_string(),
            is_generated: generated,
            is_translatable: translatable,
            url: String::new(),
        }
    }

    #[test]
    fn test_english_wins_even_when_generated() {
        let tracks = vec![track("en", true, false), track("fr", false, false)];
        assert_eq!(select_track(&tracks, "en"), Some(TrackSelection::Target(&tracks[0])));
    }

    #[test]
    fn test_manual_english_preferred_over_generated_english() {
        let tracks = vec![track("en", true, false), track("en-US", false, false)];
        assert_eq!(select_track(&tracks, "en"), Some(TrackSelection::Target(&tracks[1])));
    }

    #[test]
    fn test_first_manual_track_before_generated() {
        let tracks = vec![
            track("de", true, true),
            track("fr", false, false),
            track("es", false, false),
        ];
        assert_eq!(select_track(&tracks, "en"), Some(TrackSelection::Manual(&tracks[1])));
    }

    #[test]
    fn test_generated_fallback() {
        let tracks = vec![track("de", true, true), track("ja", true, false)];
        assert_eq!(select_track(&tracks, "en"), Some(TrackSelection::Generated(&tracks[0])));
    }

    #[test]
    fn test_no_tracks() {
        assert_eq!(select_track(&[], "en"), None);
    }

    #[test]
    fn test_other_target_language() {
        let tracks = vec![track("en", false, true), track("de", true, false)];
        assert_eq!(select_track(&tracks, "de"), Some(TrackSelection::Target(&tracks[1])));
    }
}
