//! Delete command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::ingest::IngestPipeline;
use crate::video_source::extract_video_id;
use anyhow::Result;

/// Run the delete command.
pub async fn run_delete(video_id: &str, settings: Settings) -> Result<()> {
    let pipeline = IngestPipeline::new(&settings)?;
    let video_id = extract_video_id(video_id);

    match pipeline.delete(&video_id).await {
        Ok(true) => {
            Output::success(&format!("Deleted video {}.", video_id));
        }
        Ok(false) => {
            Output::warning(&format!("No ingested video with ID '{}'.", video_id));
        }
        Err(e) => {
            Output::error(&format!("Failed to delete video: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
