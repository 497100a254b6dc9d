//! Audio download via yt-dlp.
//!
//! yt-dlp fetches the best available audio stream and its ffmpeg
//! post-processing hook transcodes it to mp3. Providers occasionally leave a
//! different container behind, so the result is located with a two-phase
//! lookup: exact name against the known extension set, then a prefix scan of
//! the working directory.

use super::{temp_base_name, AcquiredAudio, AudioAcquirer, AudioFormat};
use crate::error::{KlippError, Result};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// yt-dlp backed audio acquirer.
pub struct YtDlpAcquirer {
    yt_dlp_bin: String,
}

impl YtDlpAcquirer {
    pub fn new() -> Self {
        Self {
            yt_dlp_bin: "yt-dlp".to_string(),
        }
    }
}

impl Default for YtDlpAcquirer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioAcquirer for YtDlpAcquirer {
    #[instrument(skip(self, work_dir), fields(video_id = %video_id))]
    async fn acquire(&self, url: &str, video_id: &str, work_dir: &Path) -> Result<AcquiredAudio> {
        let base = temp_base_name(video_id);
        let template = work_dir.join(format!("{}.%(ext)s", base));

        info!("Downloading audio from {}", url);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        spinner.set_message("Downloading audio...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        let result = Command::new(&self.yt_dlp_bin)
            .arg("--format").arg("bestaudio/best")
            .arg("--extract-audio")
            .arg("--audio-format").arg("mp3")
            .arg("--audio-quality").arg("192K")
            .arg("--output").arg(template.to_str().unwrap_or_default())
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        spinner.finish_and_clear();

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(KlippError::ToolNotFound(self.yt_dlp_bin.clone()));
            }
            Err(e) => {
                return Err(KlippError::AudioDownload(format!(
                    "yt-dlp execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KlippError::AudioDownload(format!(
                "yt-dlp failed: {}",
                stderr.trim()
            )));
        }

        find_audio_file(work_dir, &base)
    }
}

/// Locates a downloaded audio file by its temporary base name.
fn find_audio_file(dir: &Path, base: &str) -> Result<AcquiredAudio> {
    // Phase one: exact base name against the known extension set.
    for format in AudioFormat::FALLBACK_ORDER {
        let candidate = dir.join(format!("{}.{}", base, format.as_str()));
        if candidate.exists() {
            debug!("Found audio file {:?}", candidate);
            return Ok(AcquiredAudio {
                path: candidate,
                format,
            });
        }
    }

    // Phase two: prefix scan for provider-mangled names.
    let entries = std::fs::read_dir(dir)
        .map_err(|e| KlippError::AudioDownload(format!("Cannot read directory: {e}")))?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with(base) {
            continue;
        }
        let format = Path::new(name.as_ref())
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(AudioFormat::from_extension);
        if let Some(format) = format {
            debug!("Found audio file {:?} via prefix scan", entry.path());
            return Ok(AcquiredAudio {
                path: entry.path(),
                format,
            });
        }
    }

    Err(KlippError::AudioNotFound(format!(
        "no file matching {}.* in {}",
        base,
        dir.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_exact_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("temp_audio_abc123.mp3"), b"x").unwrap();

        let found = find_audio_file(dir.path(), "temp_audio_abc123").unwrap();
        assert_eq!(found.format, AudioFormat::Mp3);
        assert_eq!(
            found.path.file_name().unwrap().to_str().unwrap(),
            "temp_audio_abc123.mp3"
        );
    }

    #[test]
    fn test_find_prefers_primary_container() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("temp_audio_v1.opus"), b"x").unwrap();
        std::fs::write(dir.path().join("temp_audio_v1.mp3"), b"x").unwrap();

        let found = find_audio_file(dir.path(), "temp_audio_v1").unwrap();
        assert_eq!(found.format, AudioFormat::Mp3);
    }

    #[test]
    fn test_find_via_prefix_scan() {
        let dir = tempfile::tempdir().unwrap();
        // A provider appended a stream qualifier to the base name.
        std::fs::write(dir.path().join("temp_audio_v1.f251.webm"), b"x").unwrap();

        let found = find_audio_file(dir.path(), "temp_audio_v1").unwrap();
        assert_eq!(found.format, AudioFormat::Webm);
    }

    #[test]
    fn test_prefix_scan_ignores_unknown_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("temp_audio_v1.part"), b"x").unwrap();

        let err = find_audio_file(dir.path(), "temp_audio_v1").unwrap_err();
        assert!(matches!(err, KlippError::AudioNotFound(_)));
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_audio_file(dir.path(), "temp_audio_missing").unwrap_err();
        assert!(matches!(err, KlippError::AudioNotFound(_)));
    }
}
