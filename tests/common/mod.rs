//! Fakes shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tubeqa::config::{Prompts, Settings};
use tubeqa::embedding::Embedder;
use tubeqa::orchestrator::Orchestrator;
use tubeqa::rag::ChatModel;
use tubeqa::transcript::{TranscriptProvider, TranscriptSegment, TranscriptTrack};
use tubeqa::{Result, TubeqaError};

pub fn track(code: &str, generated: bool, translatable: bool) -> TranscriptTrack {
    TranscriptTrack {
        language_code: code.to_string(),
        language: code.to_string(),
        is_generated: generated,
        is_translatable: translatable,
        url: String::new(),
    }
}

/// In-memory transcript source keyed by video id and language code.
#[derive(Default)]
pub struct FakeTranscripts {
    tracks: HashMap<String, Vec<TranscriptTrack>>,
    texts: HashMap<(String, String), String>,
    translation_fails: bool,
    pub translations: Mutex<Vec<(String, String)>>,
}

impl FakeTranscripts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track for `video_id` whose transcript is `text`.
    pub fn with_track(mut self, video_id: &str, track: TranscriptTrack, text: &str) -> Self {
        self.texts.insert(
            (video_id.to_string(), track.language_code.clone()),
            text.to_string(),
        );
        self.tracks.entry(video_id.to_string()).or_default().push(track);
        self
    }

    pub fn with_failing_translation(mut self) -> Self {
        self.translation_fails = true;
        self
    }

    fn segments(&self, video_id: &str, track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>> {
        let text = self
            .texts
            .get(&(video_id.to_string(), track.language_code.clone()))
            .ok_or_else(|| TubeqaError::TranscriptFetch(format!("no text for {}", video_id)))?;

        Ok(text
            .split('|')
            .enumerate()
            .map(|(i, part)| TranscriptSegment::new(part.trim(), i as f64 * 2.0, 2.0))
            .collect())
    }
}

#[async_trait]
impl TranscriptProvider for FakeTranscripts {
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<TranscriptTrack>> {
        Ok(self.tracks.get(video_id).cloned().unwrap_or_default())
    }

    async fn fetch(&self, video_id: &str, track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>> {
        self.segments(video_id, track)
    }

    async fn fetch_translated(
        &self,
        video_id: &str,
        track: &TranscriptTrack,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>> {
        self.translations
            .lock()
            .unwrap()
            .push((track.language_code.clone(), language.to_string()));

        if self.translation_fails {
            return Err(TubeqaError::TranscriptFetch("translation refused".to_string()));
        }

        Ok(self
            .segments(video_id, track)?
            .into_iter()
            .map(|s| TranscriptSegment::new(format!("[{}] {}", language, s.text), s.start, s.duration))
            .collect())
    }
}

/// Deterministic bag-of-words embedder: each lowercase word adds one to a
/// hashed bucket.
pub struct BagOfWords {
    dims: usize,
}

impl BagOfWords {
    pub fn new() -> Self {
        Self { dims: 64 }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0; self.dims];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = word
                .to_lowercase()
                .bytes()
                .fold(7usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize));
            v[bucket % self.dims] += 1.0;
        }
        v
    }
}

#[async_trait]
impl Embedder for BagOfWords {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

/// Counts words that start with one of a fixed list of stems, one dimension
/// per stem. Text without any of the stems embeds to the zero vector.
pub struct StemEmbedder {
    stems: Vec<String>,
}

impl StemEmbedder {
    pub fn new(stems: &[&str]) -> Self {
        Self {
            stems: stems.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .map(str::to_lowercase)
            .collect();
        self.stems
            .iter()
            .map(|stem| words.iter().filter(|w| w.starts_with(stem.as_str())).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for StemEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.stems.len()
    }
}

/// Chat model that records every prompt and replies with a fixed answer.
pub struct RecordingChat {
    pub prompts: Mutex<Vec<String>>,
    reply: String,
}

impl RecordingChat {
    pub fn new(reply: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: reply.to_string(),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatModel for RecordingChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Settings with a custom chunk size/overlap and retrieval depth.
pub fn settings(chunk_size: usize, chunk_overlap: usize, k: usize) -> Settings {
    let mut settings = Settings::default();
    settings.chunking.chunk_size = chunk_size;
    settings.chunking.chunk_overlap = chunk_overlap;
    settings.retrieval.k = k;
    settings
}

pub fn orchestrator(
    settings: Settings,
    transcripts: FakeTranscripts,
    chat: Arc<RecordingChat>,
) -> Orchestrator {
    orchestrator_with_embedder(settings, transcripts, Arc::new(BagOfWords::new()), chat)
}

pub fn orchestrator_with_embedder(
    settings: Settings,
    transcripts: FakeTranscripts,
    embedder: Arc<dyn Embedder>,
    chat: Arc<RecordingChat>,
) -> Orchestrator {
    Orchestrator::with_components(settings, Prompts::default(), Arc::new(transcripts), embedder, chat).unwrap()
}
