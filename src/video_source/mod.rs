//! Video metadata and text fetching.
//!
//! Provides a trait-based interface for fetching video info, plus video ID
//! derivation from the common YouTube URL shapes.

mod youtube;

pub use youtube::YoutubeSource;

use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Metadata and text for a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Stable video identifier.
    pub video_id: String,
    /// Title.
    pub title: String,
    /// Channel or uploader name.
    pub channel: String,
    /// Upload date as reported by the source (YYYYMMDD), if known.
    pub upload_date: Option<String>,
    /// Description text; the ingestible body when no transcript is available.
    pub description: Option<String>,
    /// Duration in seconds, if known.
    pub duration_seconds: Option<u32>,
    /// Canonical watch URL.
    pub source_url: String,
    /// Thumbnail URL, if available.
    pub thumbnail_url: Option<String>,
}

/// Trait for video metadata/text providers.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetch metadata and text for a video by ID.
    async fn get_info(&self, video_id: &str) -> Result<VideoInfo>;
}

fn id_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([^&\n?]+)").expect("Invalid regex"),
            Regex::new(r"youtube\.com/embed/([^&\n?]+)").expect("Invalid regex"),
            Regex::new(r"youtube\.com/v/([^&\n?]+)").expect("Invalid regex"),
        ]
    })
}

/// Derive a video ID from a URL or bare identifier.
///
/// The common URL shapes (`watch?v=`, `youtu.be/`, `/embed/`, `/v/`) are tried
/// in that priority order; when none match, the input itself is taken as the
/// identifier. This never fails: a malformed URL simply becomes an identifier
/// that the fetcher will reject.
pub fn extract_video_id(input: &str) -> String {
    let input = input.trim();
    for pattern in id_patterns() {
        if let Some(caps) = pattern.captures(input) {
            if let Some(m) = caps.get(1) {
                return m.as_str().to_string();
            }
        }
    }
    input.to_string()
}

/// Canonical watch URL for a video ID.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_extract_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_extract_from_embed_and_v_urls() {
        assert_eq!(
            extract_video_id("https://youtube.com/embed/dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://youtube.com/v/dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_bare_id_falls_through() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(extract_video_id("  dQw4w9WgXcQ  "), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_unrecognized_input_is_identifier() {
        // Not an error: the fetcher decides whether the ID is real.
        assert_eq!(extract_video_id("not a url at all"), "not a url at all");
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            watch_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}
