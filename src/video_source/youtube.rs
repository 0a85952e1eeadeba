//! YouTube metadata fetching via yt-dlp.

use super::{watch_url, VideoInfo, VideoSource};
use crate::error::{Result, VidraError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// YouTube video source backed by the yt-dlp tool.
pub struct YoutubeSource;

impl YoutubeSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YoutubeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoSource for YoutubeSource {
    #[instrument(skip(self))]
    async fn get_info(&self, video_id: &str) -> Result<VideoInfo> {
        let url = watch_url(video_id);

        let output = tokio::process::Command::new("yt-dlp")
            .args([
                "--dump-json",
                "--no-download",
                "--no-warnings",
                "--ignore-errors",
                &url,
            ])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VidraError::ToolNotFound("yt-dlp".to_string())
                } else {
                    VidraError::VideoSource(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VidraError::VideoSource(format!(
                "Video {} not found or unavailable: {}",
                video_id, stderr
            )));
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        let json: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| VidraError::VideoSource(format!("Failed to parse yt-dlp output: {}", e)))?;

        let title = json["title"].as_str().unwrap_or("Unknown Title").to_string();

        let channel = json["channel"]
            .as_str()
            .or_else(|| json["uploader"].as_str())
            .unwrap_or("Unknown")
            .to_string();

        let description = json["description"].as_str().map(|s| s.to_string());
        let duration = json["duration"].as_f64().map(|d| d as u32);
        let thumbnail = json["thumbnail"].as_str().map(|s| s.to_string());
        let upload_date = json["upload_date"].as_str().map(|s| s.to_string());

        debug!("Fetched metadata for video {}: {}", video_id, title);

        Ok(VideoInfo {
            video_id: video_id.to_string(),
            title,
            channel,
            upload_date,
            description,
            duration_seconds: duration,
            source_url: url,
            thumbnail_url: thumbnail,
        })
    }
}
