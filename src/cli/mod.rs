//! CLI module for tubeqa.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// tubeqa - Ask questions about a YouTube video
///
/// Fetches a video's transcript, indexes it in memory, and answers questions
/// from the most relevant passages.
#[derive(Parser, Debug)]
#[command(name = "tubeqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check system requirements and configuration
    Doctor,

    /// Fetch and index a video's transcript
    Index {
        /// YouTube URL or video ID
        video: String,
    },

    /// Index a video and answer one question about it
    Ask {
        /// YouTube URL or video ID
        video: String,

        /// The question to ask
        question: String,

        /// Number of transcript chunks to use as context
        #[arg(short, long)]
        k: Option<usize>,

        /// LLM model to use for the answer
        #[arg(short, long)]
        model: Option<String>,

        /// Print the retrieved chunks after the answer
        #[arg(long)]
        show_context: bool,
    },

    /// Show the transcript chunks closest to a query
    Search {
        /// YouTube URL or video ID
        video: String,

        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Start an interactive question session
    Chat {
        /// YouTube URL or video ID to index first
        #[arg(env = "YOUTUBE_VIDEO_ID")]
        video: Option<String>,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List the caption tracks of a video and the one that would be used
    Tracks {
        /// YouTube URL or video ID
        video: String,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Video to index before serving
        #[arg(long)]
        video: Option<String>,

        /// Index the --video before accepting requests
        #[arg(long, requires = "video")]
        auto_index: bool,
    },

    /// Print a link that opens the app pre-filled with a video
    Link {
        /// YouTube URL or video ID
        video: String,

        /// Base URL of the app
        #[arg(long, default_value = "http://127.0.0.1:3000/open")]
        base: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "answer.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from([
            "tubeqa",
            "ask",
            "https://youtu.be/abc12345678",
            "What is it about?",
            "-k",
            "2",
            "--show-context",
        ]);
        match cli.command {
            Commands::Ask {
                video,
                question,
                k,
                show_context,
                ..
            } => {
                assert_eq!(video, "https://youtu.be/abc12345678");
                assert_eq!(question, "What is it about?");
                assert_eq!(k, Some(2));
                assert!(show_context);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
