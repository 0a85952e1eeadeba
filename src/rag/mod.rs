//! Retrieval-augmented question answering.
//!
//! Answers questions about a single ingested video, grounded in its retrieved
//! chunks, with graceful degradation when no generation backend is available.

pub mod context;
mod engine;

pub use engine::AnswerEngine;

/// Number of sources shown to the user; the full list stays on the answer.
const DISPLAY_SOURCES: usize = 3;

/// Length of the text preview carried by each source.
const PREVIEW_CHARS: usize = 100;

/// A retrieved source backing an answer.
#[derive(Debug, Clone)]
pub struct SourceRef {
    /// Ordinal position marker ("Part N"), derived from the chunk index.
    /// An approximation standing in for a real timestamp, which the
    /// description-based text body cannot provide.
    pub label: String,
    /// 0-based chunk index within the video.
    pub chunk_index: u32,
    /// Similarity proxy: 1 - distance. Not a calibrated probability, and
    /// above 1 only when the distance is negative.
    pub relevance_score: f32,
    /// First characters of the chunk text, with an ellipsis when truncated.
    pub preview: String,
}

/// The outcome of one answer call.
///
/// Each variant carries only the fields meaningful for that outcome. The
/// degraded variants keep the retrieved sources and context: generation
/// problems never discard retrieval results.
#[derive(Debug, Clone)]
pub enum Answer {
    /// The generation backend produced a grounded answer.
    Success {
        answer: String,
        sources: Vec<SourceRef>,
        video_title: String,
        model: String,
    },
    /// Retrieval found nothing usable; the answer is a fixed refusal.
    NoContext { answer: String },
    /// No generation backend configured or reachable; the answer is the raw
    /// retrieved context behind a warning.
    NoLlm {
        answer: String,
        sources: Vec<SourceRef>,
        video_title: String,
    },
    /// The generation call failed; the answer is the raw retrieved context
    /// plus the failure detail.
    LlmError {
        answer: String,
        detail: String,
        sources: Vec<SourceRef>,
        video_title: String,
    },
}

impl Answer {
    /// Machine-checkable status tag.
    pub fn status(&self) -> &'static str {
        match self {
            Answer::Success { .. } => "success",
            Answer::NoContext { .. } => "no_context",
            Answer::NoLlm { .. } => "no_llm",
            Answer::LlmError { .. } => "llm_error",
        }
    }

    /// The answer text for this outcome.
    pub fn answer_text(&self) -> &str {
        match self {
            Answer::Success { answer, .. }
            | Answer::NoContext { answer }
            | Answer::NoLlm { answer, .. }
            | Answer::LlmError { answer, .. } => answer,
        }
    }

    /// All retrieved sources, ordered by descending relevance.
    pub fn sources(&self) -> &[SourceRef] {
        match self {
            Answer::Success { sources, .. }
            | Answer::NoLlm { sources, .. }
            | Answer::LlmError { sources, .. } => sources,
            Answer::NoContext { .. } => &[],
        }
    }

    /// The top sources for display.
    pub fn display_sources(&self) -> &[SourceRef] {
        let sources = self.sources();
        &sources[..sources.len().min(DISPLAY_SOURCES)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(index: u32) -> SourceRef {
        SourceRef {
            label: format!("Part {}", index + 1),
            chunk_index: index,
            relevance_score: 0.9,
            preview: "preview".to_string(),
        }
    }

    #[test]
    fn test_status_tags() {
        let no_context = Answer::NoContext {
            answer: "nothing".to_string(),
        };
        assert_eq!(no_context.status(), "no_context");
        assert!(no_context.sources().is_empty());
    }

    #[test]
    fn test_display_sources_capped_at_three() {
        let answer = Answer::NoLlm {
            answer: "context".to_string(),
            sources: (0..5).map(source).collect(),
            video_title: "Title".to_string(),
        };
        assert_eq!(answer.sources().len(), 5);
        assert_eq!(answer.display_sources().len(), 3);
    }
}
