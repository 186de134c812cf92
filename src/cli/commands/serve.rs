//! HTTP API server.
//!
//! Exposes indexing, search, and question answering over the session's
//! single active index.

use super::index::{index_with_spinner, prepare};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::TubeqaError;
use crate::orchestrator::Orchestrator;
use crate::transcript::{app_link, parse_video_ref};
use crate::vector_store::{IndexInfo, ScoredChunk};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    video: Option<String>,
    auto_index: bool,
    settings: Settings,
) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = prepare(settings, Operation::Ask)?;

    if let (Some(video), true) = (video.as_deref(), auto_index) {
        index_with_spinner(&orchestrator, video).await?;
    }

    let state = Arc::new(AppState { orchestrator });
    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("tubeqa API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Current index", "GET  /index");
    Output::kv("Index video", "POST /index");
    Output::kv("Open link", "GET  /open?video_id=..&auto_index=true");
    Output::kv("Search", "POST /search");
    Output::kv("Ask", "POST /ask");
    println!();

    if let (Some(video), false) = (video.as_deref(), auto_index) {
        let video_id = parse_video_ref(video)?;
        Output::info(&format!(
            "Open {}",
            app_link(&format!("http://{}/open", addr), &video_id)
        ));
    }
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/index", get(current_index).post(index_video))
        .route("/open", get(open))
        .route("/search", post(search))
        .route("/ask", post(ask))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct IndexRequest {
    /// YouTube URL or video ID
    video: String,
}

#[derive(Deserialize)]
struct OpenParams {
    #[serde(default)]
    video_id: String,
    #[serde(default)]
    auto_index: Option<String>,
}

#[derive(Serialize)]
struct OpenResponse {
    video_id: String,
    /// Whether this request built a new index.
    indexed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<IndexInfo>,
}

#[derive(Deserialize)]
struct SearchRequest {
    question: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<ScoredChunk>,
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
    #[serde(default)]
    show_context: bool,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources: Option<Vec<ScoredChunk>>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP status for a library error.
fn status_for(err: &TubeqaError) -> StatusCode {
    match err {
        TubeqaError::TranscriptsUnavailable { .. } | TubeqaError::VideoUnavailable { .. } => {
            StatusCode::NOT_FOUND
        }
        TubeqaError::IndexNotReady => StatusCode::CONFLICT,
        TubeqaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: TubeqaError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        warn!("Request failed: {}", err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn is_true(flag: Option<&str>) -> bool {
    matches!(flag.map(str::trim), Some(v) if v.eq_ignore_ascii_case("true") || v == "1")
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn current_index(State(state): State<Arc<AppState>>) -> Response {
    match state.orchestrator.index_info().await {
        Some(info) => Json(info).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: TubeqaError::IndexNotReady.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn index_video(State(state): State<Arc<AppState>>, Json(req): Json<IndexRequest>) -> Response {
    match state.orchestrator.index_video(&req.video).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(e),
    }
}

async fn open(State(state): State<Arc<AppState>>, Query(params): Query<OpenParams>) -> Response {
    let video_id = match parse_video_ref(&params.video_id) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    let indexed = if is_true(params.auto_index.as_deref()) {
        info!("Auto-indexing {} from link", video_id);
        match state.orchestrator.ensure_indexed(&video_id).await {
            Ok(built) => built,
            Err(e) => return error_response(e),
        }
    } else {
        false
    };

    Json(OpenResponse {
        video_id,
        indexed,
        index: state.orchestrator.index_info().await,
    })
    .into_response()
}

async fn search(State(state): State<Arc<AppState>>, Json(req): Json<SearchRequest>) -> Response {
    let k = req.k.unwrap_or(state.orchestrator.settings().retrieval.k);
    match state.orchestrator.search(&req.question, k).await {
        Ok(results) => Json(SearchResponse { results }).into_response(),
        Err(e) => error_response(e),
    }
}

async fn ask(State(state): State<Arc<AppState>>, Json(req): Json<AskRequest>) -> Response {
    match state.orchestrator.ask(&req.question).await {
        Ok(answer) => Json(AskResponse {
            answer: answer.answer,
            sources: req.show_context.then_some(answer.sources),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}
