//! Video source abstraction for Klipp.
//!
//! Provides metadata types and the resolver seam the pipeline queries before
//! any media is transferred.

mod youtube;

pub use youtube::YoutubeResolver;

use crate::error::{KlippError, Result};
use async_trait::async_trait;
use url::Url;

/// Metadata about a video, populated once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    /// Provider-issued identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Channel or author name.
    pub uploader: String,
}

impl VideoMetadata {
    /// Sentinel metadata used when the provider query fails.
    ///
    /// Metadata is cosmetic; the pipeline continues with these placeholders.
    pub fn fallback() -> Self {
        Self {
            id: "unknown".to_string(),
            title: "Unknown_Video".to_string(),
            uploader: "Неизвестно".to_string(),
        }
    }
}

/// Outcome of metadata resolution: either the provider answered, or the
/// pipeline degraded to sentinel values and kept going.
#[derive(Debug, Clone)]
pub enum ResolvedMetadata {
    /// The provider returned full metadata.
    Resolved(VideoMetadata),
    /// The provider failed; sentinel values are in effect.
    Fallback {
        metadata: VideoMetadata,
        reason: String,
    },
}

impl ResolvedMetadata {
    /// Build the degraded variant from a resolver error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Fallback {
            metadata: VideoMetadata::fallback(),
            reason: reason.into(),
        }
    }

    /// The metadata in effect for this run, sentinel or not.
    pub fn metadata(&self) -> &VideoMetadata {
        match self {
            Self::Resolved(m) => m,
            Self::Fallback { metadata, .. } => metadata,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Trait for provider metadata resolvers.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Fetch title/uploader/id for a video URL.
    async fn resolve(&self, url: &str) -> Result<VideoMetadata>;
}

/// Validate a video URL before any work is started.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|_| KlippError::InvalidInput(format!("Invalid URL format: {}", url)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(KlippError::InvalidInput(
            "URL must use HTTP or HTTPS protocol".to_string(),
        ));
    }

    Ok(parsed)
}
