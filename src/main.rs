//! Klipp CLI entry point.

use anyhow::Result;
use clap::Parser;
use klipp::cli::{commands, Cli, Commands};
use klipp::config::Settings;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("klipp={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Command-line overrides
    if let Some(language) = &cli.language {
        settings.transcription.language = language.clone();
    }
    if let Some(notes_dir) = &cli.notes_dir {
        settings.vault.notes_dir = notes_dir.to_string_lossy().into_owned();
    }

    // Execute command
    let code = match &cli.command {
        Some(Commands::Doctor) => commands::run_doctor(&settings),
        None => commands::run_clip(cli.url.as_deref(), settings).await,
    };

    Ok(code)
}
