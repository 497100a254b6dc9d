//! Clip command - the default run.

use crate::cli::{pause_on_exit, preflight, Output};
use crate::config::Settings;
use crate::pipeline::{Pipeline, ERROR_LOG_FILE};
use crate::source::validate_url;
use console::style;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

/// Run the full clip pipeline for one URL.
pub async fn run_clip(url: Option<&str>, settings: Settings) -> ExitCode {
    // Pre-flight checks before anything expensive.
    if let Err(e) = preflight::check(&settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'klipp doctor' for detailed diagnostics.");
        pause_on_exit();
        return ExitCode::FAILURE;
    }

    let url = match url {
        Some(u) => u.to_string(),
        None => match prompt_for_url() {
            Some(u) => u,
            None => {
                Output::error("No URL provided.");
                pause_on_exit();
                return ExitCode::FAILURE;
            }
        },
    };

    if let Err(e) = validate_url(&url) {
        Output::error(&format!("{}", e));
        pause_on_exit();
        return ExitCode::FAILURE;
    }

    Output::info(&format!("Processing: {}", url));

    let pipeline = match Pipeline::new(settings) {
        Ok(p) => p,
        Err(e) => {
            Output::error(&format!("{}", e));
            pause_on_exit();
            return ExitCode::FAILURE;
        }
    };

    let code = match pipeline.run(&url).await {
        Ok(report) => {
            if report.metadata_degraded {
                Output::warning("Metadata was unavailable; the note uses placeholder values.");
            }
            Output::success(&format!("Audio saved as {}", report.audio_path.display()));
            Output::success(&format!(
                "Note created: {} ({} characters transcribed)",
                report.note_path.display(),
                report.transcript_chars
            ));
            ExitCode::SUCCESS
        }
        Err(e) => {
            Output::error(&format!("Run failed: {}", e));
            Output::info(&format!("Details were written to {}", ERROR_LOG_FILE));
            ExitCode::FAILURE
        }
    };

    pause_on_exit();
    code
}

/// Ask an interactive user for the URL; None in headless contexts.
fn prompt_for_url() -> Option<String> {
    if !console::user_attended() {
        return None;
    }

    print!("{} ", style("Paste the video URL:").bold());
    io::stdout().flush().ok()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok()?;

    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
