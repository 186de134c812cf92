//! Tracks command: list a video's caption tracks.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::transcript::{parse_video_ref, select_track, TrackSelection, TranscriptProvider, YoutubeTranscripts};
use anyhow::Result;
use console::style;
use std::time::Duration;

/// Run the tracks command.
pub async fn run_tracks(video: &str, settings: Settings) -> Result<()> {
    preflight::check(Operation::Tracks)?;

    let video_id = parse_video_ref(video)?;
    let provider = YoutubeTranscripts::with_timeout(Duration::from_secs(settings.transcript.timeout_secs))?;

    let spinner = Output::spinner("Listing caption tracks...");
    let result = provider.list_tracks(&video_id).await;
    spinner.finish_and_clear();

    let tracks = match result {
        Ok(tracks) => tracks,
        Err(e) => {
            Output::error(&format!("Could not list tracks: {}", e));
            return Err(e.into());
        }
    };

    if tracks.is_empty() {
        Output::warning(&format!("No caption tracks for {}", video_id));
        return Ok(());
    }

    let target = &settings.transcript.language;
    Output::header(&format!("Caption tracks for {}", video_id));
    for track in &tracks {
        let translatable = if track.is_translatable { ", translatable" } else { "" };
        Output::list_item(&format!(
            "{} {} ({}{})",
            style(&track.language_code).bold(),
            track.language,
            track.kind(),
            translatable
        ));
    }

    println!();
    match select_track(&tracks, target) {
        Some(TrackSelection::Target(track)) => {
            Output::info(&format!("Would use {} ({})", track.language_code, track.kind()));
        }
        Some(TrackSelection::Manual(track)) | Some(TrackSelection::Generated(track)) => {
            let plan = if track.is_translatable {
                format!("translated to {}", target)
            } else {
                "untranslated".to_string()
            };
            Output::info(&format!(
                "Would use {} ({}), {}",
                track.language_code,
                track.kind(),
                plan
            ));
        }
        None => {}
    }

    Ok(())
}
