//! Transcription module for Klipp.
//!
//! Turns one audio file into one flat transcript string. The model may
//! stream partial output to the console while it runs; the returned value is
//! always the full accumulated text.

mod whisper;

pub use whisper::WhisperCppTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// A completed transcription.
#[derive(Debug, Clone)]
pub struct Transcription {
    /// The full transcript as a single flattened string.
    pub text: String,
}

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file with a spoken-language hint.
    ///
    /// The language is passed through to the model unvalidated.
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Transcription>;
}
