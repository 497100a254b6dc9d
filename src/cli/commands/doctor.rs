//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::process::{Command, ExitCode};

/// Running tally of diagnostic outcomes, printing as it goes.
#[derive(Default)]
struct Tally {
    failures: usize,
    advisories: usize,
}

impl Tally {
    fn pass(&mut self, name: &str, detail: &str) {
        println!("  {} {} {}", style("✓").green(), style(name).bold(), style(detail).dim());
    }

    fn advise(&mut self, name: &str, detail: &str) {
        self.advisories += 1;
        println!("  {} {} {}", style("!").yellow(), style(name).bold(), style(detail).dim());
    }

    fn fail(&mut self, name: &str, detail: &str, hint: &str) {
        self.failures += 1;
        println!("  {} {} {}", style("✗").red(), style(name).bold(), detail);
        println!("    {} {}", style("→").dim(), style(hint).dim());
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> ExitCode {
    Output::header("Klipp Doctor");
    println!("\nChecking system requirements and configuration...\n");

    let mut tally = Tally::default();

    println!("{}", style("External tools").bold());
    for tool in ["yt-dlp", "ffmpeg", settings.transcription.binary.as_str()] {
        match probe_tool(tool) {
            Ok(version) => tally.pass(tool, &version),
            Err(detail) => tally.fail(tool, &detail, &install_hint(tool)),
        }
    }

    println!("\n{}", style("Model").bold());
    let model = settings.model_path();
    match std::fs::metadata(&model) {
        Ok(meta) if meta.is_file() => {
            tally.pass("model file", &format!("{} ({})", model.display(), human_size(meta.len())));
        }
        _ => tally.fail(
            "model file",
            &format!("{} is missing", model.display()),
            "Download a ggml model from the whisper.cpp releases and point [transcription] model at it",
        ),
    }

    println!("\n{}", style("Vault").bold());
    let notes_dir = settings.notes_dir();
    if notes_dir.is_dir() {
        tally.pass("notes directory", &notes_dir.display().to_string());
    } else {
        tally.advise(
            "notes directory",
            &format!("{} (created on first run)", notes_dir.display()),
        );
    }

    println!("\n{}", style("Configuration").bold());
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        tally.pass("config file", &config_path.display().to_string());
    } else {
        tally.advise("config file", "not present, using defaults");
    }
    Output::kv("binary", &settings.transcription.binary);
    Output::kv("language", &settings.transcription.language);

    println!();

    if tally.failures > 0 {
        Output::error(&format!(
            "{} problem(s) found. Please fix them before using Klipp.",
            tally.failures
        ));
        ExitCode::FAILURE
    } else if tally.advisories > 0 {
        Output::warning(&format!("Ready, with {} advisory note(s).", tally.advisories));
        ExitCode::SUCCESS
    } else {
        Output::success("All checks passed! Klipp is ready to use.");
        ExitCode::SUCCESS
    }
}

/// Probe an external tool and return its version line.
fn probe_tool(name: &str) -> Result<String, String> {
    // ffmpeg takes -version (single dash), everything else --version
    let version_arg = if name == "ffmpeg" { "-version" } else { "--version" };

    let output = Command::new(name)
        .arg(version_arg)
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => "not found".to_string(),
            _ => format!("error: {}", e),
        })?;

    if !output.status.success() {
        return Err("installed but not working".to_string());
    }

    let version = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or("installed")
        .trim()
        .to_string();

    Ok(if version.len() > 50 {
        format!("{}...", &version[..50])
    } else {
        version
    })
}

/// Platform-specific install hint.
fn install_hint(tool: &str) -> String {
    let on_mac = cfg!(target_os = "macos");
    match tool {
        "yt-dlp" if on_mac => "Install with: brew install yt-dlp".to_string(),
        "yt-dlp" => "Install with: pip install yt-dlp (or your package manager)".to_string(),
        "ffmpeg" if on_mac => "Install with: brew install ffmpeg".to_string(),
        "ffmpeg" => "Install with: sudo apt install ffmpeg (or your package manager)".to_string(),
        _ if on_mac => "Install with: brew install whisper-cpp".to_string(),
        _ => "Build from: https://github.com/ggml-org/whisper.cpp".to_string(),
    }
}

/// Format a byte count for display.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
