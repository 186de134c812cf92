//! Ask command implementation.

use super::index::{index_with_spinner, prepare};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::Answer;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    video: &str,
    question: &str,
    k: Option<usize>,
    model: Option<String>,
    show_context: bool,
    mut settings: Settings,
) -> Result<()> {
    if let Some(model) = model {
        settings.answer.model = model;
    }
    if let Some(k) = k {
        settings.retrieval.k = k;
    }

    let orchestrator = prepare(settings, Operation::Ask)?;
    index_with_spinner(&orchestrator, video).await?;

    let spinner = Output::spinner("Thinking...");
    let result = orchestrator.ask(question).await;
    spinner.finish_and_clear();

    match result {
        Ok(answer) => {
            print_answer(&answer, show_context);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            Err(e.into())
        }
    }
}

/// Print an answer, optionally followed by the chunks it was based on.
pub(crate) fn print_answer(answer: &Answer, show_context: bool) {
    println!("\n{}\n", answer.answer);

    if show_context && !answer.sources.is_empty() {
        Output::header("Context");
        for (rank, source) in answer.sources.iter().enumerate() {
            Output::scored_chunk(rank + 1, source);
        }
        println!();
    }
}
