//! tubeqa CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tubeqa::cli::{commands, Cli, Commands};
use tubeqa::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tubeqa={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Doctor => {
            let path = config_path.unwrap_or_else(Settings::default_config_path);
            commands::run_doctor(&settings, &path)?;
        }

        Commands::Index { video } => {
            commands::run_index(video, settings).await?;
        }

        Commands::Ask {
            video,
            question,
            k,
            model,
            show_context,
        } => {
            commands::run_ask(video, question, *k, model.clone(), *show_context, settings).await?;
        }

        Commands::Search { video, query, k } => {
            commands::run_search(video, query, *k, settings).await?;
        }

        Commands::Chat { video, model } => {
            commands::run_chat(video.clone(), model.clone(), settings).await?;
        }

        Commands::Tracks { video } => {
            commands::run_tracks(video, settings).await?;
        }

        Commands::Serve {
            host,
            port,
            video,
            auto_index,
        } => {
            commands::run_serve(host.clone(), *port, video.clone(), *auto_index, settings).await?;
        }

        Commands::Link { video, base } => {
            commands::run_link(video, base)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
