//! Context and prompt assembly for answering.

use super::{SourceRef, PREVIEW_CHARS};
use crate::config::Prompts;
use crate::vector_store::ScoredChunk;
use std::collections::HashMap;

/// Ordinal position marker for a chunk ("Part N").
fn position_label(chunk_index: u32) -> String {
    format!("Part {}", chunk_index + 1)
}

/// Build source references from retrieval results, preserving their order.
pub fn build_sources(chunks: &[ScoredChunk]) -> Vec<SourceRef> {
    chunks
        .iter()
        .map(|chunk| SourceRef {
            label: position_label(chunk.metadata.chunk_index),
            chunk_index: chunk.metadata.chunk_index,
            relevance_score: 1.0 - chunk.distance,
            preview: preview(&chunk.text),
        })
        .collect()
}

/// Format retrieved chunks into labeled context blocks, blank-line separated.
pub fn format_context(chunks: &[ScoredChunk], prompts: &Prompts) -> String {
    chunks
        .iter()
        .map(|chunk| {
            let mut vars = HashMap::new();
            vars.insert(
                "position".to_string(),
                position_label(chunk.metadata.chunk_index),
            );
            vars.insert("text".to_string(), chunk.text.clone());
            Prompts::render(&prompts.qa.context_chunk, &vars)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Compose the full user prompt: video identity, context blocks, question.
pub fn build_prompt(
    prompts: &Prompts,
    video_title: &str,
    channel: &str,
    context: &str,
    question: &str,
) -> String {
    let mut vars = HashMap::new();
    vars.insert("title".to_string(), video_title.to_string());
    vars.insert("channel".to_string(), channel.to_string());
    vars.insert("context".to_string(), context.to_string());
    vars.insert("question".to_string(), question.to_string());
    prompts.render_with_custom(&prompts.qa.user, &vars)
}

/// First characters of a chunk, with an ellipsis when truncated.
fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::ChunkMetadata;

    fn scored(index: u32, text: &str, distance: f32) -> ScoredChunk {
        ScoredChunk {
            text: text.to_string(),
            metadata: ChunkMetadata {
                video_id: "vid1".to_string(),
                chunk_index: index,
                total_chunks: 10,
                upload_date: None,
                source_url: "https://www.youtube.com/watch?v=vid1".to_string(),
            },
            distance,
        }
    }

    #[test]
    fn test_position_labels_are_one_based() {
        let sources = build_sources(&[scored(0, "a", 0.1), scored(4, "b", 0.2)]);
        assert_eq!(sources[0].label, "Part 1");
        assert_eq!(sources[1].label, "Part 5");
    }

    #[test]
    fn test_relevance_is_one_minus_distance() {
        let sources = build_sources(&[scored(0, "a", 0.25)]);
        assert!((sources[0].relevance_score - 0.75).abs() < 0.001);

        // Negative distances push the proxy above 1; documented, not clamped.
        let sources = build_sources(&[scored(0, "a", -0.1)]);
        assert!(sources[0].relevance_score > 1.0);
    }

    #[test]
    fn test_preview_truncation() {
        let short = build_sources(&[scored(0, "short text", 0.0)]);
        assert_eq!(short[0].preview, "short text");

        let long_text = "y".repeat(250);
        let long = build_sources(&[scored(0, &long_text, 0.0)]);
        assert_eq!(long[0].preview.chars().count(), 103);
        assert!(long[0].preview.ends_with("..."));
    }

    #[test]
    fn test_format_context_blocks() {
        let prompts = Prompts::default();
        let context = format_context(
            &[scored(1, "first passage", 0.1), scored(3, "second passage", 0.2)],
            &prompts,
        );
        assert_eq!(
            context,
            "[Part 2] first passage\n\n[Part 4] second passage"
        );
    }

    #[test]
    fn test_build_prompt_includes_everything() {
        let prompts = Prompts::default();
        let prompt = build_prompt(
            &prompts,
            "Video Title",
            "The Channel",
            "[Part 1] context here",
            "What is discussed?",
        );
        assert!(prompt.contains("Video Title"));
        assert!(prompt.contains("The Channel"));
        assert!(prompt.contains("[Part 1] context here"));
        assert!(prompt.contains("What is discussed?"));
    }
}
