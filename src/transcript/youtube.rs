//! YouTube caption source.
//!
//! Tracks are enumerated through the innertube `player` endpoint (the API key
//! is read from the watch page) and fetched as timed-text XML.

use super::{TranscriptProvider, TranscriptSegment, TranscriptTrack};
use crate::error::{Result, TubeqaError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player?key=";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

static API_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("Invalid regex")
});

static CONSENT_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="v" value="(.*?)""#).expect("Invalid regex"));

static TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("Invalid regex")
});

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("Invalid regex"));

static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

/// Caption tracks from YouTube over HTTP.
pub struct YoutubeTranscripts {
    client: reqwest::Client,
}

impl YoutubeTranscripts {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TubeqaError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn get_text(&self, url: &str, cookie: Option<&str>) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(fetch_error)?;
        let status = response.status();
        if status.as_u16() == 429 {
            return Err(TubeqaError::TranscriptFetch(
                "YouTube is rate limiting requests from this IP".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(TubeqaError::TranscriptFetch(format!("{} returned {}", url, status)));
        }

        response.text().await.map_err(fetch_error)
    }

    /// Fetch the watch page, accepting the cookie consent form if one is shown.
    async fn watch_page(&self, video_id: &str) -> Result<String> {
        let url = format!("{}{}", WATCH_URL, video_id);
        let html = self.get_text(&url, None).await?;

        if !html.contains("action=\"https://consent.youtube.com/s\"") {
            return Ok(html);
        }

        let consent = parse_consent_value(&html).ok_or_else(|| {
            TubeqaError::TranscriptFetch("Could not accept the YouTube consent form".to_string())
        })?;
        debug!("Accepting consent form for {}", video_id);

        let html = self
            .get_text(&url, Some(&format!("CONSENT=YES+{}", consent)))
            .await?;
        if html.contains("action=\"https://consent.youtube.com/s\"") {
            return Err(TubeqaError::TranscriptFetch(
                "YouTube kept asking for cookie consent".to_string(),
            ));
        }
        Ok(html)
    }

    async fn player_response(&self, video_id: &str, api_key: &str) -> Result<Value> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id
        });

        let response = self
            .client
            .post(format!("{}{}", PLAYER_URL, api_key))
            .json(&body)
            .send()
            .await
            .map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TubeqaError::TranscriptFetch(format!(
                "Player request for {} returned {}",
                video_id, status
            )));
        }

        response.json().await.map_err(fetch_error)
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<TranscriptSegment>> {
        if url.is_empty() {
            return Err(TubeqaError::TranscriptFetch("Track has no URL".to_string()));
        }
        if url.contains("exp=xpe") {
            return Err(TubeqaError::TranscriptFetch(
                "This track can only be fetched with a proof-of-origin token".to_string(),
            ));
        }

        let xml = self.get_text(url, None).await?;
        if xml.trim().is_empty() {
            return Err(TubeqaError::TranscriptFetch(
                "YouTube returned an empty transcript".to_string(),
            ));
        }

        Ok(parse_timedtext(&xml))
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeTranscripts {
    #[instrument(skip(self))]
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<TranscriptTrack>> {
        let html = self.watch_page(video_id).await?;

        let api_key = match parse_api_key(&html) {
            Some(key) => key,
            None if html.contains("class=\"g-recaptcha\"") => {
                return Err(TubeqaError::TranscriptFetch(
                    "YouTube is asking for a captcha; requests from this IP are blocked".to_string(),
                ))
            }
            None => {
                return Err(TubeqaError::TranscriptFetch(format!(
                    "Could not find the innertube API key on the page for {}",
                    video_id
                )))
            }
        };

        let player = self.player_response(video_id, &api_key).await?;
        let tracks = parse_player_response(video_id, &player)?;
        debug!("Found {} caption tracks", tracks.len());
        Ok(tracks)
    }

    #[instrument(skip(self, track), fields(language = %track.language_code))]
    async fn fetch(&self, _video_id: &str, track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>> {
        self.fetch_url(&track.url).await
    }

    #[instrument(skip(self, track), fields(language = %track.language_code))]
    async fn fetch_translated(
        &self,
        _video_id: &str,
        track: &TranscriptTrack,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>> {
        if !track.is_translatable {
            return Err(TubeqaError::TranscriptFetch(format!(
                "Track {} cannot be translated",
                track.language_code
            )));
        }
        let url = translated_url(&track.url, language)?;
        self.fetch_url(&url).await
    }
}

fn fetch_error(e: reqwest::Error) -> TubeqaError {
    TubeqaError::TranscriptFetch(e.to_string())
}

fn parse_api_key(html: &str) -> Option<String> {
    API_KEY.captures(html).map(|caps| caps[1].to_string())
}

fn parse_consent_value(html: &str) -> Option<String> {
    CONSENT_VALUE.captures(html).map(|caps| caps[1].to_string())
}

/// Read the caption track list out of a player response.
fn parse_player_response(video_id: &str, player: &Value) -> Result<Vec<TranscriptTrack>> {
    let playability = &player["playabilityStatus"];
    let status = playability["status"].as_str().unwrap_or("OK");
    if status != "OK" {
        let reason = playability["reason"]
            .as_str()
            .unwrap_or("no reason given")
            .to_string();
        if status == "LOGIN_REQUIRED" && reason.contains("bot") {
            return Err(TubeqaError::TranscriptFetch(format!(
                "YouTube is blocking requests: {}",
                reason
            )));
        }
        return Err(TubeqaError::VideoUnavailable {
            video_id: video_id.to_string(),
            reason,
        });
    }

    let renderer = &player["captions"]["playerCaptionsTracklistRenderer"];
    if renderer.is_null() {
        return Err(TubeqaError::TranscriptsUnavailable {
            video_id: video_id.to_string(),
        });
    }

    let tracks = renderer["captionTracks"]
        .as_array()
        .map(|tracks| tracks.iter().filter_map(parse_caption_track).collect())
        .unwrap_or_default();

    Ok(tracks)
}

fn parse_caption_track(track: &Value) -> Option<TranscriptTrack> {
    let base_url = track["baseUrl"].as_str()?;
    let language_code = track["languageCode"].as_str()?.to_string();

    let language = track["name"]["runs"][0]["text"]
        .as_str()
        .or_else(|| track["name"]["simpleText"].as_str())
        .unwrap_or(&language_code)
        .to_string();

    Some(TranscriptTrack {
        language,
        is_generated: track["kind"].as_str() == Some("asr"),
        is_translatable: track["isTranslatable"].as_bool().unwrap_or(false),
        url: strip_format_param(base_url),
        language_code,
    })
}

/// Drop the `fmt` query parameter so the endpoint answers in plain timed-text XML.
fn strip_format_param(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.replace("&fmt=srv3", "");
    };

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.to_string()
}

fn translated_url(raw: &str, language: &str) -> Result<String> {
    let mut url = Url::parse(raw)
        .map_err(|e| TubeqaError::TranscriptFetch(format!("Invalid track URL {}: {}", raw, e)))?;
    url.query_pairs_mut().append_pair("tlang", language);
    Ok(url.to_string())
}

/// Parse `<text start=".." dur="..">..</text>` elements into segments.
fn parse_timedtext(xml: &str) -> Vec<TranscriptSegment> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|caps| {
            let mut start = 0.0;
            let mut duration = 0.0;
            for attr in ATTRIBUTE.captures_iter(&caps[1]) {
                match &attr[1] {
                    "start" => start = attr[2].parse().unwrap_or(0.0),
                    "dur" => duration = attr[2].parse().unwrap_or(0.0),
                    _ => {}
                }
            }

            // Text is XML-escaped once and HTML-escaped inside that.
            let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let unescaped = decode_entities(body);
            let stripped = MARKUP_TAG.replace_all(&unescaped, "");
            let text = decode_entities(&stripped).replace('\n', " ");
            let text = text.trim();

            if text.is_empty() {
                None
            } else {
                Some(TranscriptSegment::new(text, start, duration))
            }
        })
        .collect()
}

/// Decode one level of XML/HTML character references.
fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let decoded = after
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&after[..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_api_key() {
        let html = r#"<script>ytcfg.set({"INNERTUBE_API_KEY": "AIzaSyA-test_key", "X": 1})</script>"#;
        assert_eq!(parse_api_key(html), Some("AIzaSyA-test_key".to_string()));
        assert_eq!(parse_api_key("<html></html>"), None);
    }

    #[test]
    fn test_parse_consent_value() {
        let html = r#"<form action="https://consent.youtube.com/s"><input name="v" value="cb.20210328-17-p0.de+FX+123"></form>"#;
        assert_eq!(
            parse_consent_value(html),
            Some("cb.20210328-17-p0.de+FX+123".to_string())
        );
    }

    #[test]
    fn test_parse_player_response_tracks() {
        let player = json!({
            "playabilityStatus": { "status": "OK" },
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        {
                            "baseUrl": "https://www.youtube.com/api/timedtext?v=abc12345678&lang=de&fmt=srv3",
                            "name": { "runs": [{ "text": "German (auto-generated)" }] },
                            "languageCode": "de",
                            "kind": "asr",
                            "isTranslatable": true
                        },
                        {
                            "baseUrl": "https://www.youtube.com/api/timedtext?v=abc12345678&lang=fr",
                            "name": { "simpleText": "French" },
                            "languageCode": "fr"
                        },
                        { "languageCode": "xx" }
                    ]
                }
            }
        });

        let tracks = parse_player_response("abc12345678", &player).unwrap();
        assert_eq!(tracks.len(), 2);

        assert_eq!(tracks[0].language_code, "de");
        assert_eq!(tracks[0].language, "German (auto-generated)");
        assert!(tracks[0].is_generated);
        assert!(tracks[0].is_translatable);
        assert!(!tracks[0].url.contains("fmt="));
        assert!(tracks[0].url.contains("lang=de"));

        assert_eq!(tracks[1].language, "French");
        assert!(!tracks[1].is_generated);
        assert!(!tracks[1].is_translatable);
    }

    #[test]
    fn test_missing_captions_means_unavailable() {
        let player = json!({ "playabilityStatus": { "status": "OK" } });
        match parse_player_response("abc12345678", &player) {
            Err(TubeqaError::TranscriptsUnavailable { video_id }) => assert_eq!(video_id, "abc12345678"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_unplayable_video() {
        let player = json!({
            "playabilityStatus": { "status": "ERROR", "reason": "This video is unavailable" }
        });
        assert!(matches!(
            parse_player_response("abc12345678", &player),
            Err(TubeqaError::VideoUnavailable { .. })
        ));

        let blocked = json!({
            "playabilityStatus": { "status": "LOGIN_REQUIRED", "reason": "Sign in to confirm you're not a bot" }
        });
        assert!(matches!(
            parse_player_response("abc12345678", &blocked),
            Err(TubeqaError::TranscriptFetch(_))
        ));
    }

    #[test]
    fn test_parse_timedtext() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
            <text start="0.5" dur="2.25">Hey there &amp;amp; welcome</text>
            <text start="2.75" dur="1.5">it&amp;#39;s &lt;i&gt;great&lt;/i&gt;
to be here</text>
            <text start="4.25" dur="1"></text>
            <text start="5.25" dur="0.5"/>
            <text dur="3" start="6">[Music]</text>
        </transcript>"#;

        let segments = parse_timedtext(xml);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], TranscriptSegment::new("Hey there & welcome", 0.5, 2.25));
        assert_eq!(segments[1].text, "it's great to be here");
        assert_eq!(segments[1].start, 2.75);
        assert_eq!(segments[2], TranscriptSegment::new("[Music]", 6.0, 3.0));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt; b &gt; c"), "a < b > c");
        assert_eq!(decode_entities("&#39;&#x41;&quot;"), "'A\"");
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("&bogus; &amp"), "&bogus; &amp");
        assert_eq!(decode_entities("&amp;amp;"), "&amp;");
    }

    #[test]
    fn test_translated_url() {
        let url = translated_url("https://www.youtube.com/api/timedtext?v=abc&lang=de", "en").unwrap();
        assert_eq!(url, "https://www.youtube.com/api/timedtext?v=abc&lang=de&tlang=en");
        assert!(translated_url("not a url", "en").is_err());
    }

    #[test]
    fn test_strip_format_param() {
        assert_eq!(
            strip_format_param("https://www.youtube.com/api/timedtext?v=abc&fmt=srv3&lang=en"),
            "https://www.youtube.com/api/timedtext?v=abc&lang=en"
        );
        assert_eq!(
            strip_format_param("https://www.youtube.com/api/timedtext?fmt=srv3"),
            "https://www.youtube.com/api/timedtext"
        );
    }
}
