//! Pipeline orchestrator for tubeqa.
//!
//! Coordinates the process from transcript fetch to answering, and owns the
//! session's current index.

use crate::chunking::{TextSplitter, LANGUAGE_KEY, SOURCE_KEY};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, TubeqaError};
use crate::rag::{Answer, AnswerComposer, ChatModel, OpenAIChatModel, Retriever};
use crate::transcript::{acquire_transcript, parse_video_ref, TranscriptProvider, YoutubeTranscripts};
use crate::vector_store::{IndexInfo, Indexer, ScoredChunk, VectorIndex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// The main orchestrator for the tubeqa pipeline.
///
/// Holds at most one index. A new build replaces it only once the build has
/// fully succeeded; a failed build leaves the previous index in place.
pub struct Orchestrator {
    settings: Settings,
    provider: Arc<dyn TranscriptProvider>,
    splitter: TextSplitter,
    indexer: Indexer,
    composer: AnswerComposer,
    active: RwLock<Option<Arc<VectorIndex>>>,
}

impl Orchestrator {
    /// Create an orchestrator backed by YouTube and OpenAI.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let provider = Arc::new(YoutubeTranscripts::with_timeout(Duration::from_secs(
            settings.transcript.timeout_secs,
        ))?);

        let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding)?);

        let chat = Arc::new(OpenAIChatModel::new(
            &settings.answer.model,
            settings.answer.temperature,
        )?);

        Self::with_components(settings, prompts, provider, embedder, chat)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        provider: Arc<dyn TranscriptProvider>,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        let splitter = TextSplitter::from_settings(&settings.chunking)?;
        let indexer = Indexer::new(embedder.clone());
        let retriever = Retriever::new(embedder).with_k(settings.retrieval.k);
        let composer = AnswerComposer::new(retriever, chat).with_prompts(prompts);

        Ok(Self {
            settings,
            provider,
            splitter,
            indexer,
            composer,
            active: RwLock::new(None),
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Fetch, chunk, embed, and index a video, replacing the current index.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn index_video(&self, input: &str) -> Result<IndexReport> {
        let video_id = parse_video_ref(input)?;

        info!("Fetching transcript for {}", video_id);
        let transcript = acquire_transcript(
            self.provider.as_ref(),
            &video_id,
            &self.settings.transcript.language,
        )
        .await?;
        let language = transcript.language.to_string();
        let segment_count = transcript.segments.len();
        debug!("Fetched {} segments in {}", segment_count, language);

        let mut metadata = BTreeMap::new();
        metadata.insert(SOURCE_KEY.to_string(), video_id.clone());
        metadata.insert(LANGUAGE_KEY.to_string(), language.clone());

        let chunks = self.splitter.create_chunks(&transcript.full_text(), &metadata);
        let chunk_count = chunks.len();
        info!("Split transcript into {} chunks", chunk_count);

        let index = self.indexer.build(&video_id, &language, chunks).await?;
        let index_id = index.id();

        *self.active.write().await = Some(Arc::new(index));
        info!("Index for {} is now active", video_id);

        Ok(IndexReport {
            video_id,
            language,
            segment_count,
            chunk_count,
            index_id,
        })
    }

    /// Index `input` unless it is already the active video.
    ///
    /// Returns whether a build ran.
    pub async fn ensure_indexed(&self, input: &str) -> Result<bool> {
        let video_id = parse_video_ref(input)?;
        if self.indexed_video().await.as_deref() == Some(video_id.as_str()) {
            debug!("{} is already indexed", video_id);
            return Ok(false);
        }

        self.index_video(&video_id).await?;
        Ok(true)
    }

    /// The current index, if one has been built.
    pub async fn active(&self) -> Option<Arc<VectorIndex>> {
        self.active.read().await.clone()
    }

    /// The video id of the current index.
    pub async fn indexed_video(&self) -> Option<String> {
        self.active().await.map(|index| index.video_id().to_string())
    }

    pub async fn index_info(&self) -> Option<IndexInfo> {
        self.active().await.map(|index| index.info())
    }

    /// Retrieve the `k` chunks of the current index nearest to `question`.
    pub async fn search(&self, question: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let question = require_question(question)?;
        let index = self.require_index().await?;
        self.composer.retriever().retrieve_k(&index, question, k).await
    }

    /// Answer `question` from the current index.
    #[instrument(skip(self))]
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let question = require_question(question)?;
        let index = self.require_index().await?;
        self.composer.answer(&index, question).await
    }

    async fn require_index(&self) -> Result<Arc<VectorIndex>> {
        self.active().await.ok_or(TubeqaError::IndexNotReady)
    }
}

fn require_question(question: &str) -> Result<&str> {
    let question = question.trim();
    if question.is_empty() {
        return Err(TubeqaError::InvalidInput("Enter a question.".to_string()));
    }
    Ok(question)
}

/// Result of indexing a video.
#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub video_id: String,
    /// Language the transcript was indexed in, e.g. "en" or "de->en".
    pub language: String,
    pub segment_count: usize,
    pub chunk_count: usize,
    pub index_id: Uuid,
}
