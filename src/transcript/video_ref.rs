//! Turning user input into a YouTube video id.

use crate::error::{Result, TubeqaError};
use regex::Regex;
use std::sync::LazyLock;

static WATCH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]v=([A-Za-z0-9_-]{11})").expect("Invalid regex"));

static SHORT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([A-Za-z0-9_-]{11})").expect("Invalid regex"));

/// Extract a video id from a watch URL, a `youtu.be` link, or a bare id.
///
/// Input that matches neither URL form is returned trimmed, unchanged.
pub fn extract_video_id(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return String::new();
    }

    WATCH_PARAM
        .captures(input)
        .or_else(|| SHORT_LINK.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| input.to_string())
}

/// Like [`extract_video_id`], but empty input is an error.
pub fn parse_video_ref(input: &str) -> Result<String> {
    let video_id = extract_video_id(input);
    if video_id.is_empty() {
        return Err(TubeqaError::InvalidInput(
            "Enter a YouTube video URL or ID.".to_string(),
        ));
    }
    Ok(video_id)
}

/// Build a link that opens the app pre-filled with `video_id` and asks it to
/// index the video straight away.
pub fn app_link(base: &str, video_id: &str) -> String {
    let base = base.trim();
    let video_id = video_id.trim();
    if video_id.is_empty() {
        return base.to_string();
    }

    let separator = if base.contains('?') { '&' } else { '?' };
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("video_id", video_id);
    query.append_pair("auto_index", "true");
    format!("{}{}{}", base, separator, query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc12345678"),
            "abc12345678"
        );
        assert_eq!(extract_video_id("https://youtu.be/abc12345678"), "abc12345678");
        assert_eq!(extract_video_id("abc12345678"), "abc12345678");
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(extract_video_id("  dQw4w9WgXcQ \n"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_unmatched_input_returned_as_is() {
        assert_eq!(extract_video_id("not-a-video"), "not-a-video");
        assert_eq!(extract_video_id(""), "");
        assert_eq!(extract_video_id("   "), "");
    }

    #[test]
    fn test_parse_video_ref_rejects_empty() {
        assert!(parse_video_ref(" ").is_err());
        assert_eq!(parse_video_ref("https://youtu.be/abc12345678").unwrap(), "abc12345678");
    }

    #[test]
    fn test_app_link() {
        assert_eq!(
            app_link("http://localhost:3000", "abc12345678"),
            "http://localhost:3000?video_id=abc12345678&auto_index=true"
        );
        assert_eq!(
            app_link("http://localhost:3000/open?x=1", "abc12345678"),
            "http://localhost:3000/open?x=1&video_id=abc12345678&auto_index=true"
        );
        assert_eq!(app_link("http://localhost:3000", ""), "http://localhost:3000");
    }
}
