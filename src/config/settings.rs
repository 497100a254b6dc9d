//! Configuration settings for Klipp.

use crate::error::{KlippError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub vault: VaultSettings,
    pub transcription: TranscriptionSettings,
}

/// General application settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self { log_level: "info".into() }
    }
}

/// Vault settings: where the generated notes land.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSettings {
    /// Directory the Markdown notes are written to.
    pub notes_dir: String,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            notes_dir: "~/Documents/Obsidian/Clippings".into(),
        }
    }
}

/// Transcription service settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Name or path of the whisper.cpp CLI binary.
    pub binary: String,
    /// Path to the whisper model file.
    pub model: String,
    /// Spoken language hint passed to the model ("auto" for detection).
    pub language: String,
    /// Echo transcript lines to the console while the model runs.
    pub echo_progress: bool,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            binary: "whisper-cli".into(),
            model: "~/.klipp/models/ggml-base.bin".into(),
            language: "auto".into(),
            echo_progress: true,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from `path`, or from the default location when None.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = path.cloned().unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save settings to a specific path, creating parent directories.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| KlippError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("klipp")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded notes directory path.
    pub fn notes_dir(&self) -> PathBuf {
        Self::expand_path(&self.vault.notes_dir)
    }

    /// Get the expanded whisper model path.
    pub fn model_path(&self) -> PathBuf {
        Self::expand_path(&self.transcription.model)
    }
}
