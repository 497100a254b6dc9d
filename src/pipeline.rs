//! Pipeline orchestration for Klipp.
//!
//! Coordinates the run from metadata resolution to the persisted note.
//! Stages execute strictly in sequence; the first fatal error aborts the
//! remaining stages and is recorded in a diagnostic log.

use crate::audio::{AudioAcquirer, YtDlpAcquirer};
use crate::config::Settings;
use crate::error::{KlippError, Result};
use crate::note::{
    ensure_notes_dir, finalize_audio, sanitize_title, unique_path, write_note, Note,
};
use crate::source::{MetadataResolver, ResolvedMetadata, VideoMetadata, YoutubeResolver};
use crate::transcription::{Transcriber, WhisperCppTranscriber};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Fixed name of the diagnostic log, overwritten on each failing run.
pub const ERROR_LOG_FILE: &str = "error_log.txt";

/// Pipeline state machine. A run moves top to bottom; `Failed` absorbs from
/// any stage after `Init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ResolvingMetadata,
    Acquiring,
    Transcribing,
    Persisting,
    Done,
    Failed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::ResolvingMetadata => "resolving-metadata",
            Stage::Acquiring => "acquiring",
            Stage::Transcribing => "transcribing",
            Stage::Persisting => "persisting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// A fatal error tagged with the stage it occurred in.
struct Failure {
    stage: Stage,
    error: KlippError,
}

impl Failure {
    fn at(stage: Stage, error: KlippError) -> Self {
        Self { stage, error }
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct RunReport {
    /// Metadata in effect for the run (sentinel values when degraded).
    pub metadata: VideoMetadata,
    /// Whether metadata resolution fell back to sentinel values.
    pub metadata_degraded: bool,
    /// Final absolute path of the audio file.
    pub audio_path: PathBuf,
    /// Path of the written note.
    pub note_path: PathBuf,
    /// Length of the transcript in characters.
    pub transcript_chars: usize,
}

/// The main pipeline.
pub struct Pipeline {
    settings: Settings,
    work_dir: PathBuf,
    resolver: Arc<dyn MetadataResolver>,
    acquirer: Arc<dyn AudioAcquirer>,
    transcriber: Arc<dyn Transcriber>,
}

impl Pipeline {
    /// Create a pipeline with the production components.
    pub fn new(settings: Settings) -> Result<Self> {
        let transcriber = Arc::new(WhisperCppTranscriber::new(
            &settings.transcription.binary,
            settings.model_path(),
            settings.transcription.echo_progress,
        ));

        Ok(Self {
            settings,
            work_dir: std::env::current_dir()?,
            resolver: Arc::new(YoutubeResolver::new()),
            acquirer: Arc::new(YtDlpAcquirer::new()),
            transcriber,
        })
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        settings: Settings,
        work_dir: PathBuf,
        resolver: Arc<dyn MetadataResolver>,
        acquirer: Arc<dyn AudioAcquirer>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        Self {
            settings,
            work_dir,
            resolver,
            acquirer,
            transcriber,
        }
    }

    /// Run the pipeline for one URL.
    ///
    /// Every fatal error is caught here: a diagnostic record lands in
    /// [`ERROR_LOG_FILE`] before the error is handed back to the caller.
    pub async fn run(&self, url: &str) -> Result<RunReport> {
        match self.execute(url).await {
            Ok(report) => {
                debug!("Pipeline state: {}", Stage::Done);
                Ok(report)
            }
            Err(failure) => {
                error!("Pipeline failed while {}: {}", failure.stage, failure.error);
                debug!("Pipeline state: {}", Stage::Failed);
                self.write_failure_log(url, &failure);
                Err(failure.error)
            }
        }
    }

    async fn execute(&self, url: &str) -> std::result::Result<RunReport, Failure> {
        debug!("Pipeline state: {}", Stage::Init);

        // The vault must be writable before any network or model work is
        // spent on this run.
        let notes_dir = self.settings.notes_dir();
        ensure_notes_dir(&notes_dir).map_err(|e| Failure::at(Stage::Init, e))?;

        // Metadata is cosmetic: resolution failures degrade to sentinel
        // values instead of aborting.
        debug!("Pipeline state: {}", Stage::ResolvingMetadata);
        eprintln!("  Fetching metadata...");
        let resolved = match self.resolver.resolve(url).await {
            Ok(metadata) => {
                eprintln!("  Title: {}", metadata.title);
                eprintln!("  Uploader: {}", metadata.uploader);
                ResolvedMetadata::Resolved(metadata)
            }
            Err(e) => {
                warn!("Metadata resolution failed, continuing with placeholders: {}", e);
                eprintln!("  Metadata unavailable, continuing with placeholders.");
                ResolvedMetadata::unavailable(e.to_string())
            }
        };
        let metadata = resolved.metadata().clone();

        debug!("Pipeline state: {}", Stage::Acquiring);
        eprintln!("  Downloading audio...");
        let audio = self
            .acquirer
            .acquire(url, &metadata.id, &self.work_dir)
            .await
            .map_err(|e| Failure::at(Stage::Acquiring, e))?;
        eprintln!("  Audio downloaded.");

        debug!("Pipeline state: {}", Stage::Transcribing);
        eprintln!("  Transcribing...");
        let transcription = self
            .transcriber
            .transcribe(&audio.path, &self.settings.transcription.language)
            .await
            .map_err(|e| Failure::at(Stage::Transcribing, e))?;
        eprintln!("  Transcription complete.");

        debug!("Pipeline state: {}", Stage::Persisting);
        let safe_title = sanitize_title(&metadata.title);

        let audio_path = finalize_audio(&audio, &safe_title, &self.work_dir)
            .map_err(|e| Failure::at(Stage::Persisting, e))?;

        let transcript_chars = transcription.text.chars().count();
        let note = Note::new(metadata.clone(), url, audio_path.clone(), transcription.text);
        let note_path = unique_path(&notes_dir.join(format!("{}.md", safe_title)));

        write_note(&note_path, &note.render())
            .map_err(|e| Failure::at(Stage::Persisting, e))?;

        info!("Note written to {}", note_path.display());

        Ok(RunReport {
            metadata,
            metadata_degraded: resolved.is_fallback(),
            audio_path,
            note_path,
            transcript_chars,
        })
    }

    /// Write the diagnostic record for a failed run.
    ///
    /// The log lives under a fixed name in the working directory and is
    /// overwritten, not appended, so it always describes the latest failure.
    fn write_failure_log(&self, url: &str, failure: &Failure) {
        let mut record = format!(
            "{}\nURL: {}\nStage: {}\nError: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            url,
            failure.stage,
            failure.error
        );

        let mut cause = std::error::Error::source(&failure.error);
        while let Some(err) = cause {
            record.push_str(&format!("Caused by: {}\n", err));
            cause = err.source();
        }

        let log_path = self.work_dir.join(ERROR_LOG_FILE);
        if let Err(e) = std::fs::write(&log_path, record) {
            warn!("Could not write {}: {}", log_path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AcquiredAudio, AudioFormat};
    use crate::transcription::Transcription;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubResolver {
        metadata: Option<VideoMetadata>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MetadataResolver for StubResolver {
        async fn resolve(&self, _url: &str) -> Result<VideoMetadata> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.metadata
                .clone()
                .ok_or_else(|| KlippError::Metadata("provider unreachable".into()))
        }
    }

    struct StubAcquirer {
        format: Option<AudioFormat>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AudioAcquirer for StubAcquirer {
        async fn acquire(
            &self,
            _url: &str,
            video_id: &str,
            work_dir: &Path,
        ) -> Result<AcquiredAudio> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let format = self
                .format
                .ok_or_else(|| KlippError::AudioDownload("download refused".into()))?;
            let path = work_dir.join(format!("temp_audio_{}.{}", video_id, format.as_str()));
            std::fs::write(&path, b"fake audio")?;
            Ok(AcquiredAudio { path, format })
        }
    }

    struct StubTranscriber {
        text: Option<String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transcriber for StubTranscriber {
        async fn transcribe(&self, _audio_path: &Path, _language: &str) -> Result<Transcription> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text
                .clone()
                .map(|text| Transcription { text })
                .ok_or_else(|| KlippError::Transcription("model rejected the file".into()))
        }
    }

    struct Harness {
        work_dir: tempfile::TempDir,
        vault_dir: PathBuf,
        resolver: Arc<StubResolver>,
        acquirer: Arc<StubAcquirer>,
        transcriber: Arc<StubTranscriber>,
    }

    impl Harness {
        fn new() -> Self {
            let work_dir = tempfile::tempdir().unwrap();
            let vault_dir = work_dir.path().join("vault");
            Self {
                work_dir,
                vault_dir,
                resolver: Arc::new(StubResolver {
                    metadata: Some(VideoMetadata {
                        id: "abc123".into(),
                        title: "Test Video".into(),
                        uploader: "Acme".into(),
                    }),
                    calls: AtomicUsize::new(0),
                }),
                acquirer: Arc::new(StubAcquirer {
                    format: Some(AudioFormat::Mp3),
                    calls: AtomicUsize::new(0),
                }),
                transcriber: Arc::new(StubTranscriber {
                    text: Some("hello world".into()),
                    calls: AtomicUsize::new(0),
                }),
            }
        }

        fn pipeline(&self) -> Pipeline {
            let mut settings = Settings::default();
            settings.vault.notes_dir = self.vault_dir.to_string_lossy().into_owned();
            Pipeline::with_components(
                settings,
                self.work_dir.path().to_path_buf(),
                self.resolver.clone(),
                self.acquirer.clone(),
                self.transcriber.clone(),
            )
        }
    }

    const URL: &str = "https://example.com/watch?v=abc123";

    #[tokio::test]
    async fn test_end_to_end_success() {
        let harness = Harness::new();
        let report = harness.pipeline().run(URL).await.unwrap();

        // Audio renamed to the sanitized title in the working directory,
        // temporary file gone.
        let audio = harness.work_dir.path().join("Test Video.mp3");
        assert!(audio.exists());
        assert!(!harness
            .work_dir
            .path()
            .join("temp_audio_abc123.mp3")
            .exists());

        // One note in the vault with the expected frontmatter and body.
        let note = harness.vault_dir.join("Test Video.md");
        let content = std::fs::read_to_string(&note).unwrap();
        assert!(content.contains(&format!("source: \"{}\"", URL)));
        assert!(content.contains("author: \"Acme\""));
        assert!(content.contains("hello world"));

        assert!(!report.metadata_degraded);
        assert_eq!(report.note_path, note);
        assert_eq!(report.transcript_chars, "hello world".len());
    }

    #[tokio::test]
    async fn test_metadata_failure_still_produces_note() {
        let mut harness = Harness::new();
        harness.resolver = Arc::new(StubResolver {
            metadata: None,
            calls: AtomicUsize::new(0),
        });

        let report = harness.pipeline().run(URL).await.unwrap();

        assert!(report.metadata_degraded);
        assert_eq!(report.metadata.title, "Unknown_Video");

        let note = harness.vault_dir.join("Unknown_Video.md");
        let content = std::fs::read_to_string(&note).unwrap();
        assert!(content.contains("author: \"Неизвестно\""));
        assert!(content.contains("hello world"));

        // The temporary audio name falls back to the sentinel id.
        assert!(harness.work_dir.path().join("Unknown_Video.mp3").exists());
    }

    #[tokio::test]
    async fn test_transcription_failure_leaves_audio_and_log() {
        let mut harness = Harness::new();
        harness.transcriber = Arc::new(StubTranscriber {
            text: None,
            calls: AtomicUsize::new(0),
        });

        let err = harness.pipeline().run(URL).await.unwrap_err();
        assert!(matches!(err, KlippError::Transcription(_)));

        // No note was written.
        assert!(std::fs::read_dir(&harness.vault_dir)
            .unwrap()
            .next()
            .is_none());

        // The downloaded audio stays in place under its temporary name.
        assert!(harness
            .work_dir
            .path()
            .join("temp_audio_abc123.mp3")
            .exists());

        // The diagnostic log names the stage and the error.
        let log = std::fs::read_to_string(harness.work_dir.path().join(ERROR_LOG_FILE)).unwrap();
        assert!(log.contains("Stage: transcribing"));
        assert!(log.contains("model rejected the file"));
    }

    #[tokio::test]
    async fn test_fail_fast_when_vault_unavailable() {
        let mut harness = Harness::new();
        // A regular file where the vault should be makes creation fail.
        let blocked = harness.work_dir.path().join("blocked");
        std::fs::write(&blocked, b"").unwrap();
        harness.vault_dir = blocked.join("sub");

        let err = harness.pipeline().run(URL).await.unwrap_err();
        assert!(matches!(err, KlippError::Directory(_)));

        // No provider, download, or model call happened.
        assert_eq!(harness.resolver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(harness.acquirer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(harness.transcriber.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_run_suffixes_both_artifacts() {
        let harness = Harness::new();

        harness.pipeline().run(URL).await.unwrap();
        let report = harness.pipeline().run(URL).await.unwrap();

        assert!(harness.work_dir.path().join("Test Video.mp3").exists());
        assert!(harness.work_dir.path().join("Test Video_1.mp3").exists());
        assert!(harness.vault_dir.join("Test Video.md").exists());
        assert!(harness.vault_dir.join("Test Video_1.md").exists());
        assert!(report.note_path.ends_with("Test Video_1.md"));
    }

    #[tokio::test]
    async fn test_acquisition_failure_logs_stage() {
        let mut harness = Harness::new();
        harness.acquirer = Arc::new(StubAcquirer {
            format: None,
            calls: AtomicUsize::new(0),
        });

        let err = harness.pipeline().run(URL).await.unwrap_err();
        assert!(matches!(err, KlippError::AudioDownload(_)));

        let log = std::fs::read_to_string(harness.work_dir.path().join(ERROR_LOG_FILE)).unwrap();
        assert!(log.contains("Stage: acquiring"));
        // The transcriber never ran.
        assert_eq!(harness.transcriber.calls.load(Ordering::SeqCst), 0);
    }
}
