//! Process command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::ingest::{IngestOutcome, IngestPipeline};
use anyhow::Result;

/// Run the process command.
pub async fn run_process(
    input: &str,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Process) {
        Output::error(&format!("{}", e));
        Output::info("Run 'vidra doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let chunk_size = chunk_size.unwrap_or(settings.chunking.chunk_size);
    let chunk_overlap = chunk_overlap.unwrap_or(settings.chunking.chunk_overlap);

    let pipeline = IngestPipeline::new(&settings)?;

    let spinner = Output::spinner("Processing video...");

    match pipeline.process(input, chunk_size, chunk_overlap).await {
        Ok(IngestOutcome::Ingested {
            video_id,
            title,
            channel,
            chunk_count,
        }) => {
            spinner.finish_and_clear();
            Output::success("Video processed successfully!");
            Output::kv("Title", &title);
            Output::kv("Channel", &channel);
            Output::kv("Video ID", &video_id);
            Output::kv("Chunks", &chunk_count.to_string());
        }
        Ok(IngestOutcome::AlreadyExists {
            video_id,
            chunk_count,
        }) => {
            spinner.finish_and_clear();
            Output::info(&format!(
                "Video {} is already processed ({} chunks).",
                video_id, chunk_count
            ));
            Output::info("Delete it first with 'vidra delete' to re-process.");
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to process video: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
