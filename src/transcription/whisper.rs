//! whisper.cpp transcription implementation.

use super::{Transcriber, Transcription};
use crate::error::{KlippError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, instrument};

/// Local whisper.cpp based transcriber.
///
/// Spawns the `whisper-cli` binary and reads its stdout as the model emits
/// text, so long transcriptions show progress instead of a silent wait.
pub struct WhisperCppTranscriber {
    binary: String,
    model_path: PathBuf,
    /// Echo transcript lines to the console while the model runs.
    echo_progress: bool,
}

impl WhisperCppTranscriber {
    pub fn new(binary: &str, model_path: PathBuf, echo_progress: bool) -> Self {
        Self {
            binary: binary.to_string(),
            model_path,
            echo_progress,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCppTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Transcription> {
        debug!("Transcribing with model {:?}", self.model_path);

        let spawn_result = Command::new(&self.binary)
            .arg("-m").arg(&self.model_path)
            .arg("-f").arg(audio_path)
            .arg("-l").arg(language)
            .arg("--no-timestamps")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let mut child = match spawn_result {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(KlippError::ToolNotFound(self.binary.clone()));
            }
            Err(e) => {
                return Err(KlippError::Transcription(format!(
                    "failed to start {}: {e}",
                    self.binary
                )));
            }
        };

        // Drain stderr concurrently so a chatty model load can't fill the
        // pipe while stdout is being read.
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut buf).await;
            }
            buf
        });

        let stdout = child.stdout.take().ok_or_else(|| {
            KlippError::Transcription("could not capture model output".to_string())
        })?;

        let mut lines = BufReader::new(stdout).lines();
        let mut text = String::new();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| KlippError::Transcription(format!("failed to read model output: {e}")))?
        {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if self.echo_progress {
                println!("{}", trimmed);
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(trimmed);
        }

        let status = child
            .wait()
            .await
            .map_err(|e| KlippError::Transcription(format!("model process error: {e}")))?;

        let stderr_text = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(KlippError::Transcription(format!(
                "{} exited with {}: {}",
                self.binary,
                status,
                stderr_text.trim()
            )));
        }

        if text.is_empty() {
            return Err(KlippError::Transcription(
                "model produced no output (corrupt or empty audio?)".to_string(),
            ));
        }

        Ok(Transcription { text })
    }
}
