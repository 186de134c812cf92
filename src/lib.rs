//! tubeqa - Ask questions about a YouTube video
//!
//! Fetches a video's caption transcript, splits it into overlapping chunks,
//! embeds them into an in-memory index, and answers questions from the chunks
//! closest to each question.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `transcript` - Caption track listing, selection, and fetching
//! - `chunking` - Recursive character text splitting
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory vector index
//! - `rag` - Retrieval and answer generation
//! - `orchestrator` - Pipeline coordination and the session's index
//!
//! # Example
//!
//! ```rust,no_run
//! use tubeqa::config::Settings;
//! use tubeqa::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let report = orchestrator.index_video("https://youtu.be/dQw4w9WgXcQ").await?;
//!     println!("Indexed {} chunks", report.chunk_count);
//!
//!     let answer = orchestrator.ask("What is the song about?").await?;
//!     println!("{}", answer.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod transcript;
pub mod vector_store;

pub use error::{Result, TubeqaError};
