//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::embedding::OpenAIEmbedder;
use crate::generation::{Generator, OpenAIGenerator};
use crate::ingest::IngestPipeline;
use crate::rag::AnswerEngine;
use crate::video_source::extract_video_id;
use anyhow::Result;
use std::sync::Arc;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    video: &str,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        Output::info("Run 'vidra doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let video_id = extract_video_id(video);
    let model = model.unwrap_or_else(|| settings.rag.model.clone());
    let temperature = temperature.unwrap_or(settings.rag.temperature);
    let max_tokens = max_tokens.unwrap_or(settings.rag.max_tokens);

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;

    let pipeline = IngestPipeline::new(&settings)?;

    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
        settings.embedding.batch_size,
    ));

    let generator: Arc<dyn Generator> = Arc::new(OpenAIGenerator::new(&model));

    let engine = AnswerEngine::new(
        pipeline.vector_store(),
        embedder,
        Some(generator),
        settings.rag.top_k,
    )
    .with_prompts(prompts);

    let spinner = Output::spinner("Searching video content...");

    match engine
        .answer(question, &video_id, temperature, max_tokens)
        .await
    {
        Ok(answer) => {
            spinner.finish_and_clear();

            if answer.status() != "success" {
                Output::warning(&format!("Answer status: {}", answer.status()));
            }

            println!("\n{}\n", answer.answer_text());

            if !answer.display_sources().is_empty() {
                Output::header("Sources");
                for source in answer.display_sources() {
                    Output::source(&source.label, source.relevance_score, &source.preview);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to answer question: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
