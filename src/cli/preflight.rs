//! Pre-flight checks before expensive operations.
//!
//! Validates that the external tools and the model file are available
//! before starting a run that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{KlippError, Result};
use std::process::Command;

/// Run pre-flight checks for a transcription run.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(settings: &Settings) -> Result<()> {
    check_tool("yt-dlp")?;
    check_tool("ffmpeg")?;
    check_tool(&settings.transcription.binary)?;
    check_model(settings)?;
    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg takes -version (single dash), everything else --version
    let version_arg = if name == "ffmpeg" { "-version" } else { "--version" };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(KlippError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(KlippError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(KlippError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

/// Check that the configured whisper model file exists.
fn check_model(settings: &Settings) -> Result<()> {
    let model = settings.model_path();
    if model.is_file() {
        Ok(())
    } else {
        Err(KlippError::Config(format!(
            "Whisper model not found at {}. Download one from the whisper.cpp releases \
             and point [transcription] model at it.",
            model.display()
        )))
    }
}
