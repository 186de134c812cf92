//! Link command: print a pre-filled app URL for a video.

use crate::transcript::{app_link, parse_video_ref};
use anyhow::Result;

/// Run the link command.
pub fn run_link(video: &str, base: &str) -> Result<()> {
    let video_id = parse_video_ref(video)?;
    println!("{}", app_link(base, &video_id));
    Ok(())
}
