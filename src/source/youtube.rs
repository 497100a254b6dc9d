//! yt-dlp backed metadata resolver.

use super::{MetadataResolver, VideoMetadata};
use crate::error::{KlippError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Resolves video metadata through `yt-dlp --dump-json`.
///
/// Works for any provider yt-dlp understands, not just YouTube; the name
/// follows the primary use case.
pub struct YoutubeResolver {
    yt_dlp_bin: String,
}

impl YoutubeResolver {
    pub fn new() -> Self {
        Self {
            yt_dlp_bin: "yt-dlp".to_string(),
        }
    }

    /// Fetch metadata without transferring any media.
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata> {
        debug!("Fetching metadata for {}", url);

        let output = Command::new(&self.yt_dlp_bin)
            .args(["--dump-json", "--no-download", "--no-playlist", "--no-warnings", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    KlippError::ToolNotFound(self.yt_dlp_bin.clone())
                } else {
                    KlippError::Metadata(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KlippError::Metadata(format!(
                "yt-dlp could not describe {}: {}",
                url,
                stderr.trim()
            )));
        }

        let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

        let id = json["id"]
            .as_str()
            .ok_or_else(|| KlippError::Metadata("yt-dlp output has no video id".to_string()))?
            .to_string();

        let title = json["title"].as_str().unwrap_or("Unknown_Video").to_string();

        let uploader = json["uploader"]
            .as_str()
            .or_else(|| json["channel"].as_str())
            .unwrap_or("Неизвестно")
            .to_string();

        Ok(VideoMetadata { id, title, uploader })
    }
}

impl Default for YoutubeResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataResolver for YoutubeResolver {
    async fn resolve(&self, url: &str) -> Result<VideoMetadata> {
        self.fetch_metadata(url).await
    }
}
