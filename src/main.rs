//! Vidra CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidra::cli::{commands, Cli, Commands};
use vidra::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vidra={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Process {
            input,
            chunk_size,
            chunk_overlap,
        } => {
            commands::run_process(input, *chunk_size, *chunk_overlap, settings).await?;
        }

        Commands::Ask {
            question,
            video,
            model,
            temperature,
            max_tokens,
        } => {
            commands::run_ask(
                question,
                video,
                model.clone(),
                *temperature,
                *max_tokens,
                settings,
            )
            .await?;
        }

        Commands::List => {
            commands::run_list(settings).await?;
        }

        Commands::Delete { video_id } => {
            commands::run_delete(video_id, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
