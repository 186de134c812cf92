//! Search command implementation.

use super::index::{index_with_spinner, prepare};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(video: &str, query: &str, k: Option<usize>, settings: Settings) -> Result<()> {
    let k = k.unwrap_or(settings.retrieval.k);
    let orchestrator = prepare(settings, Operation::Index)?;
    index_with_spinner(&orchestrator, video).await?;

    let spinner = Output::spinner("Searching...");
    let results = orchestrator.search(query, k).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) => {
            if results.is_empty() {
                Output::warning("No results found.");
            } else {
                Output::success(&format!("Found {} results", results.len()));
                for (rank, result) in results.iter().enumerate() {
                    Output::scored_chunk(rank + 1, result);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
