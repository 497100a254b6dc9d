//! Markdown note rendering and artifact persistence.

use super::unique_path;
use crate::audio::AcquiredAudio;
use crate::error::{KlippError, Result};
use crate::source::VideoMetadata;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed classification tags carried in every note's frontmatter.
pub const NOTE_TAGS: [&str; 3] = ["youtube", "transcription", "clipping"];

/// A fully assembled note, ready to render.
#[derive(Debug, Clone)]
pub struct Note {
    created: String,
    source_url: String,
    metadata: VideoMetadata,
    audio_path: PathBuf,
    transcript: String,
}

impl Note {
    pub fn new(
        metadata: VideoMetadata,
        source_url: &str,
        audio_path: PathBuf,
        transcript: String,
    ) -> Self {
        Self {
            created: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
            source_url: source_url.to_string(),
            metadata,
            audio_path,
            transcript,
        }
    }

    /// Render the note as Markdown with YAML frontmatter.
    pub fn render(&self) -> String {
        let tags = NOTE_TAGS
            .iter()
            .map(|tag| format!("  - {}", tag))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "---\n\
             created: {created}\n\
             tags:\n{tags}\n\
             source: \"{url}\"\n\
             author: \"{author}\"\n\
             ---\n\
             \n\
             # {title}\n\
             \n\
             **Author:** {author}\n\
             **Processed:** {created}\n\
             **Original:** [Open the source]({url})\n\
             **Audio:** ![[{audio}]]\n\
             \n\
             ---\n\
             \n\
             ## Transcript\n\
             \n\
             {transcript}\n",
            created = self.created,
            tags = tags,
            url = self.source_url,
            author = self.metadata.uploader,
            title = self.metadata.title,
            audio = self.audio_path.display(),
            transcript = self.transcript,
        )
    }
}

/// Make sure the notes directory exists before any expensive stage runs.
pub fn ensure_notes_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        KlippError::Directory(format!("cannot create {}: {e}", dir.display()))
    })
}

/// Move the temporary audio file to its final, collision-free name.
///
/// Returns the absolute path of the renamed file. The temporary path does
/// not exist afterwards.
pub fn finalize_audio(audio: &AcquiredAudio, safe_title: &str, work_dir: &Path) -> Result<PathBuf> {
    let target = unique_path(&work_dir.join(format!("{}.{}", safe_title, audio.format.as_str())));

    std::fs::rename(&audio.path, &target).map_err(|e| {
        KlippError::Persist(format!(
            "could not move audio to {}: {e}",
            target.display()
        ))
    })?;

    debug!("Audio saved as {:?}", target);

    // Absolute path so the note's embed resolves from anywhere.
    Ok(std::fs::canonicalize(&target).unwrap_or(target))
}

/// Write the note through a temporary sibling so a failed write never
/// leaves a partial note behind.
pub fn write_note(path: &Path, content: &str) -> Result<()> {
    let staging = path.with_extension("md.tmp");

    std::fs::write(&staging, content).map_err(|e| {
        let _ = std::fs::remove_file(&staging);
        KlippError::Persist(format!("could not write {}: {e}", path.display()))
    })?;

    std::fs::rename(&staging, path).map_err(|e| {
        let _ = std::fs::remove_file(&staging);
        KlippError::Persist(format!("could not finalize {}: {e}", path.display()))
    })?;

    Ok(())
}
