//! The answering engine.

use super::context::{build_prompt, build_sources, format_context};
use super::Answer;
use crate::config::Prompts;
use crate::embedding::Embedder;
use crate::error::{Result, VidraError};
use crate::generation::{GenerationRequest, Generator};
use crate::vector_store::VectorStore;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Retrieval-augmented answering engine for ingested videos.
///
/// Stateless: every `answer` call is independent and nothing about past
/// exchanges is kept.
pub struct AnswerEngine {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    generator: Option<Arc<dyn Generator>>,
    prompts: Prompts,
    top_k: usize,
}

impl AnswerEngine {
    /// Create a new answering engine.
    ///
    /// Pass `None` for the generator to run retrieval-only; answers then
    /// always degrade to raw context.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        generator: Option<Arc<dyn Generator>>,
        top_k: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            generator,
            prompts: Prompts::default(),
            top_k: top_k.max(1),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Answer a question about one ingested video.
    ///
    /// Retrieval problems with the video itself are errors
    /// (`CollectionNotFound` when it was never ingested); generation problems
    /// are not, and degrade to context-only answers.
    #[instrument(skip(self), fields(video_id = %video_id))]
    pub async fn answer(
        &self,
        question: &str,
        video_id: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(VidraError::InvalidInput("Question is empty".to_string()));
        }

        let collection = self
            .store
            .get_collection(video_id)
            .await?
            .ok_or_else(|| VidraError::CollectionNotFound(video_id.to_string()))?;

        debug!("Searching for relevant content in video {}", video_id);
        let query_embedding = self.embedder.embed(question).await?;

        let retrieved = match self
            .store
            .query(video_id, &query_embedding, self.top_k)
            .await
        {
            Ok(chunks) => chunks,
            Err(VidraError::CollectionEmpty(_)) => Vec::new(),
            Err(e) => return Err(e),
        };

        if retrieved.is_empty() {
            return Ok(Answer::NoContext {
                answer: self.prompts.qa.no_context_response.clone(),
            });
        }

        let sources = build_sources(&retrieved);
        let context = format_context(&retrieved, &self.prompts);
        let prompt = build_prompt(
            &self.prompts,
            &collection.title,
            &collection.channel,
            &context,
            question,
        );

        let generator = match &self.generator {
            Some(g) => {
                if g.is_available().await {
                    Some(g)
                } else {
                    None
                }
            }
            None => None,
        };

        let Some(generator) = generator else {
            warn!("Generation backend unavailable, returning raw context");
            return Ok(Answer::NoLlm {
                answer: format!(
                    "Generation backend is not available. Here is the relevant context from the video:\n\n{}",
                    context
                ),
                sources,
                video_title: collection.title,
            });
        };

        info!("Generating answer with {}", generator.model());
        let request = GenerationRequest {
            prompt,
            system: self.prompts.qa.system.clone(),
            temperature,
            max_tokens,
        };

        match generator.generate(&request).await {
            Ok(text) => Ok(Answer::Success {
                answer: text.trim().to_string(),
                sources,
                video_title: collection.title,
                model: generator.model().to_string(),
            }),
            Err(e) => {
                warn!("Generation failed: {}", e);
                Ok(Answer::LlmError {
                    answer: format!(
                        "Error generating answer: {}\n\nRelevant context:\n\n{}",
                        e, context
                    ),
                    detail: e.to_string(),
                    sources,
                    video_title: collection.title,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::{
        ChunkMetadata, CollectionMetadata, MemoryVectorStore, StoredChunk,
    };
    use async_trait::async_trait;

    struct FakeEmbedder;

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let seed: u32 = text.bytes().map(u32::from).sum();
            Ok((0..8)
                .map(|i| ((seed.wrapping_add(i)) % 97) as f32 / 97.0)
                .collect())
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            8
        }
    }

    struct FakeGenerator {
        available: bool,
        response: Result<String>,
    }

    impl FakeGenerator {
        fn working(text: &str) -> Self {
            Self {
                available: true,
                response: Ok(text.to_string()),
            }
        }

        fn unreachable() -> Self {
            Self {
                available: false,
                response: Ok(String::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                available: true,
                response: Err(VidraError::OpenAI(message.to_string())),
            }
        }
    }

    #[async_trait]
    impl Generator for FakeGenerator {
        async fn is_available(&self) -> bool {
            self.available
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(VidraError::Generation(e.to_string())),
            }
        }

        fn model(&self) -> &str {
            "fake-model"
        }
    }

    async fn populated_store(chunk_texts: &[&str]) -> Arc<MemoryVectorStore> {
        let store = Arc::new(MemoryVectorStore::new());
        store
            .get_or_create_collection(
                "vid1",
                &CollectionMetadata {
                    title: "Ownership in Rust".to_string(),
                    channel: "Rust Channel".to_string(),
                },
            )
            .await
            .unwrap();

        let embedder = FakeEmbedder;
        let total = chunk_texts.len() as u32;
        let mut chunks = Vec::new();
        for (i, text) in chunk_texts.iter().enumerate() {
            chunks.push(StoredChunk {
                id: format!("chunk_{}", i),
                text: text.to_string(),
                embedding: embedder.embed(text).await.unwrap(),
                metadata: ChunkMetadata {
                    video_id: "vid1".to_string(),
                    chunk_index: i as u32,
                    total_chunks: total,
                    upload_date: None,
                    source_url: "https://www.youtube.com/watch?v=vid1".to_string(),
                },
            });
        }
        store.insert_chunks("vid1", &chunks).await.unwrap();
        store
    }

    fn engine(
        store: Arc<MemoryVectorStore>,
        generator: Option<FakeGenerator>,
    ) -> AnswerEngine {
        AnswerEngine::new(
            store,
            Arc::new(FakeEmbedder),
            generator.map(|g| Arc::new(g) as Arc<dyn Generator>),
            5,
        )
    }

    #[tokio::test]
    async fn test_never_ingested_video_is_not_found() {
        let store = Arc::new(MemoryVectorStore::new());
        let engine = engine(store, Some(FakeGenerator::working("answer")));

        let err = engine
            .answer("What is this about?", "ghost", 0.1, 500)
            .await
            .unwrap_err();
        assert!(matches!(err, VidraError::CollectionNotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let store = populated_store(&["some content here"]).await;
        let engine = engine(store, Some(FakeGenerator::working("answer")));

        let err = engine.answer("   ", "vid1", 0.1, 500).await.unwrap_err();
        assert!(matches!(err, VidraError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_empty_collection_yields_no_context() {
        let store = Arc::new(MemoryVectorStore::new());
        store
            .get_or_create_collection(
                "vid1",
                &CollectionMetadata {
                    title: "Empty".to_string(),
                    channel: "Channel".to_string(),
                },
            )
            .await
            .unwrap();
        let engine = engine(store, Some(FakeGenerator::working("answer")));

        let answer = engine
            .answer("Anything in here?", "vid1", 0.1, 500)
            .await
            .unwrap();
        assert_eq!(answer.status(), "no_context");
        assert!(answer.sources().is_empty());
        assert!(!answer.answer_text().is_empty());
    }

    #[tokio::test]
    async fn test_success_path() {
        let store = populated_store(&[
            "Ownership moves values between bindings.",
            "Borrowing lets you read without taking ownership.",
        ])
        .await;
        let engine = engine(store, Some(FakeGenerator::working("  The video explains ownership. [Part 1]  ")));

        let answer = engine
            .answer("What is ownership?", "vid1", 0.1, 500)
            .await
            .unwrap();

        assert_eq!(answer.status(), "success");
        // Whitespace-trimmed generated text.
        assert_eq!(
            answer.answer_text(),
            "The video explains ownership. [Part 1]"
        );
        assert_eq!(answer.sources().len(), 2);

        // Sources ordered by descending relevance.
        let scores: Vec<f32> = answer.sources().iter().map(|s| s.relevance_score).collect();
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[tokio::test]
    async fn test_no_generator_degrades_to_context() {
        let store = populated_store(&["Relevant passage about lifetimes."]).await;
        let engine = engine(store, None);

        let answer = engine
            .answer("What about lifetimes?", "vid1", 0.1, 500)
            .await
            .unwrap();

        assert_eq!(answer.status(), "no_llm");
        assert!(!answer.sources().is_empty());
        assert!(answer
            .answer_text()
            .contains("Relevant passage about lifetimes."));
    }

    #[tokio::test]
    async fn test_unreachable_generator_degrades_to_context() {
        let store = populated_store(&["Passage one.", "Passage two."]).await;
        let engine = engine(store, Some(FakeGenerator::unreachable()));

        let answer = engine
            .answer("A question", "vid1", 0.1, 500)
            .await
            .unwrap();
        assert_eq!(answer.status(), "no_llm");
        assert_eq!(answer.sources().len(), 2);
    }

    #[tokio::test]
    async fn test_generator_failure_keeps_context() {
        let store = populated_store(&["The only passage."]).await;
        let engine = engine(store, Some(FakeGenerator::failing("rate limited")));

        let answer = engine
            .answer("A question", "vid1", 0.1, 500)
            .await
            .unwrap();

        assert_eq!(answer.status(), "llm_error");
        assert!(!answer.sources().is_empty());
        assert!(answer.answer_text().contains("The only passage."));
        match answer {
            Answer::LlmError { detail, .. } => assert!(detail.contains("rate limited")),
            other => panic!("Expected LlmError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_top_k_clamped_to_collection_size() {
        let store = populated_store(&["Just one chunk."]).await;
        let engine = engine(store, None);

        let answer = engine
            .answer("A question", "vid1", 0.1, 500)
            .await
            .unwrap();
        assert_eq!(answer.sources().len(), 1);
    }

    #[tokio::test]
    async fn test_source_previews_and_labels() {
        let long_text = format!("Opening words. {}", "x".repeat(200));
        let store = populated_store(&[&long_text]).await;
        let engine = engine(store, None);

        let answer = engine
            .answer("A question", "vid1", 0.1, 500)
            .await
            .unwrap();

        let source = &answer.sources()[0];
        assert_eq!(source.label, "Part 1");
        assert!(source.preview.ends_with("..."));
        assert_eq!(source.preview.chars().count(), 103);
    }
}
