//! Configuration module for Klipp.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{GeneralSettings, Settings, TranscriptionSettings, VaultSettings};
