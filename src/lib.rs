//! Klipp - Clip online videos into transcribed notes
//!
//! A local-first CLI tool that downloads the audio track of a video,
//! transcribes it with a local whisper.cpp model, and files a Markdown note
//! into an Obsidian-style vault.
//!
//! The name "Klipp" comes from the Norwegian word for "clip."
//!
//! # Overview
//!
//! A run moves through four stages in strict sequence:
//!
//! 1. Resolve video metadata (best-effort; placeholder values on failure)
//! 2. Download the audio track via yt-dlp
//! 3. Transcribe it with whisper.cpp, echoing progress as the model runs
//! 4. Rename the audio and write the note, both collision-free
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `source` - Video metadata resolution
//! - `audio` - Audio acquisition
//! - `transcription` - Speech-to-text transcription
//! - `note` - Note composition and persistence
//! - `pipeline` - Stage sequencing and failure diagnostics
//!
//! # Example
//!
//! ```rust,no_run
//! use klipp::config::Settings;
//! use klipp::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = Pipeline::new(settings)?;
//!
//!     let report = pipeline
//!         .run("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!         .await?;
//!     println!("Note created: {}", report.note_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod note;
pub mod pipeline;
pub mod source;
pub mod transcription;

pub use error::{KlippError, Result};
