//! CLI module for Klipp.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{pause_on_exit, Output};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Klipp - clip online videos into transcribed notes
///
/// Downloads the audio track of a video, transcribes it locally with
/// whisper.cpp, and writes a Markdown note into your vault linking the
/// source, the author, and the transcript. The name "Klipp" comes from the
/// Norwegian word for "clip."
#[derive(Parser, Debug)]
#[command(name = "klipp")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Video URL to transcribe (prompted for interactively when omitted)
    pub url: Option<String>,

    /// Spoken language hint for the speech model (e.g. "en", "ru", "auto")
    #[arg(short, long)]
    pub language: Option<String>,

    /// Directory the note is written to (overrides the configured vault)
    #[arg(short = 'd', long)]
    pub notes_dir: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check system requirements and configuration
    Doctor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_invocation() {
        let cli = Cli::try_parse_from(["klipp", "https://example.com/v"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://example.com/v"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_no_arguments() {
        let cli = Cli::try_parse_from(["klipp"]).unwrap();
        assert!(cli.url.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_doctor_subcommand() {
        let cli = Cli::try_parse_from(["klipp", "doctor"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Doctor)));
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "klipp",
            "-l",
            "ru",
            "-d",
            "/tmp/vault",
            "-vv",
            "https://example.com/v",
        ])
        .unwrap();
        assert_eq!(cli.language.as_deref(), Some("ru"));
        assert_eq!(cli.notes_dir.as_deref(), Some(std::path::Path::new("/tmp/vault")));
        assert_eq!(cli.verbose, 2);
    }
}
