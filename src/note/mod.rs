//! Note composition and persistence for Klipp.
//!
//! Owns everything that touches artifact names: title sanitization,
//! collision-free naming for both the audio file and the note, and the
//! final Markdown output.

mod composer;

pub use composer::{ensure_notes_dir, finalize_audio, write_note, Note, NOTE_TAGS};

use std::path::{Path, PathBuf};

/// Characters that are not allowed in artifact file names.
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Upper bound on the sanitized title length, to stay clear of filesystem
/// path limits.
const MAX_TITLE_CHARS: usize = 100;

/// Derive a filesystem-safe title.
///
/// Replaces disallowed characters with underscores, trims surrounding
/// whitespace, and bounds the length. Sanitizing an already-sanitized title
/// is a no-op.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();

    let truncated: String = replaced.trim().chars().take(MAX_TITLE_CHARS).collect();
    let cleaned = truncated.trim();

    if cleaned.is_empty() {
        "Untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Find a free path by appending `_1`, `_2`, … to the file stem.
///
/// Returns the input unchanged when nothing occupies it; never overwrites
/// an existing file.
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    let extension = path.extension().and_then(|s| s.to_str());
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut counter = 1u32;
    loop {
        let name = match extension {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
