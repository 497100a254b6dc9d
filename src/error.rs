//! Error types for Klipp.

use thiserror::Error;

/// Library-level error type for Klipp operations.
#[derive(Error, Debug)]
pub enum KlippError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notes directory error: {0}")]
    Directory(String),

    #[error("Metadata resolution failed: {0}")]
    Metadata(String),

    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("Audio file not found: {0}")]
    AudioNotFound(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Note persistence failed: {0}")]
    Persist(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias for Klipp operations.
pub type Result<T> = std::result::Result<T, KlippError>;
