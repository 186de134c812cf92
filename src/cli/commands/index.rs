//! Index command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{IndexReport, Orchestrator};
use anyhow::Result;

/// Run the index command.
pub async fn run_index(video: &str, settings: Settings) -> Result<()> {
    let orchestrator = prepare(settings, Operation::Index)?;
    index_with_spinner(&orchestrator, video).await?;
    Ok(())
}

/// Run pre-flight checks and build the orchestrator.
pub(crate) fn prepare(settings: Settings, operation: Operation) -> Result<Orchestrator> {
    if let Err(e) = preflight::check(operation) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubeqa doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    Ok(Orchestrator::new(settings)?)
}

/// Index a video while showing a spinner, then print the report.
pub(crate) async fn index_with_spinner(orchestrator: &Orchestrator, video: &str) -> Result<IndexReport> {
    let spinner = Output::spinner("Fetching transcript and building index...");
    let result = orchestrator.index_video(video).await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            Output::index_report(&report);
            Ok(report)
        }
        Err(e) => {
            Output::error(&format!("Indexing failed: {}", e));
            Err(e.into())
        }
    }
}
