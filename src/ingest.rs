//! Ingestion pipeline for Vidra.
//!
//! Coordinates the process from video URL to indexed collection:
//! fetch metadata/text, chunk, embed, store.

use crate::chunking::chunk_text;
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, VidraError};
use crate::vector_store::{
    ChunkMetadata, CollectionMetadata, CollectionSummary, MemoryVectorStore, SqliteVectorStore,
    StoredChunk, VectorStore,
};
use crate::video_source::{extract_video_id, VideoSource, YoutubeSource};
use std::sync::Arc;
use tracing::{info, instrument};

/// Result of processing a video.
///
/// Errors (fetch failure, unusable text, chunking failure) are reported
/// through `VidraError`, so each variant carries only fields that are
/// meaningful for its outcome.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// The video was fetched, chunked, embedded, and stored.
    Ingested {
        video_id: String,
        title: String,
        channel: String,
        chunk_count: usize,
    },
    /// A populated collection already existed; nothing was fetched or written.
    AlreadyExists {
        video_id: String,
        chunk_count: usize,
    },
}

/// The ingestion pipeline.
///
/// Callers must not ingest the same video ID concurrently from multiple
/// threads or processes; the existence check and the insert are not covered
/// by one lock. Wrap `process` in an external mutex keyed by video ID if
/// concurrent ingestion is required.
pub struct IngestPipeline {
    fetcher: Arc<dyn VideoSource>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    min_text_chars: usize,
}

impl IngestPipeline {
    /// Create a pipeline from settings, with the default component stack.
    pub fn new(settings: &Settings) -> Result<Self> {
        let store: Arc<dyn VectorStore> = match settings.vector_store.provider.as_str() {
            "memory" => Arc::new(MemoryVectorStore::new()),
            _ => Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?),
        };

        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
            settings.embedding.batch_size,
        ));

        Ok(Self {
            fetcher: Arc::new(YoutubeSource::new()),
            embedder,
            store,
            min_text_chars: settings.ingest.min_text_chars,
        })
    }

    /// Create a pipeline with custom components.
    pub fn with_components(
        fetcher: Arc<dyn VideoSource>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        min_text_chars: usize,
    ) -> Self {
        Self {
            fetcher,
            embedder,
            store,
            min_text_chars,
        }
    }

    /// Get a reference to the vector store.
    pub fn vector_store(&self) -> Arc<dyn VectorStore> {
        self.store.clone()
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Process a video: fetch its text, chunk, embed, and store.
    ///
    /// Accepts a URL in any of the common shapes or a bare video ID. When a
    /// populated collection already exists for the derived ID, returns
    /// `AlreadyExists` without fetching; ingestion never appends to or
    /// duplicates an existing collection.
    #[instrument(skip(self), fields(input = %input))]
    pub async fn process(
        &self,
        input: &str,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<IngestOutcome> {
        let video_id = extract_video_id(input);

        if self.store.collection_exists_with_data(&video_id).await? {
            let chunk_count = self
                .store
                .get_collection(&video_id)
                .await?
                .map(|c| c.chunk_count as usize)
                .unwrap_or(0);
            info!(
                "Video {} already ingested ({} chunks), skipping",
                video_id, chunk_count
            );
            return Ok(IngestOutcome::AlreadyExists {
                video_id,
                chunk_count,
            });
        }

        info!("Fetching metadata for video {}", video_id);
        let video = self.fetcher.get_info(&video_id).await?;

        // The description is the ingestible text body; real caption extraction
        // is a fetcher concern this pipeline does not take on.
        let text = video.description.clone().unwrap_or_default();
        if text.trim().chars().count() < self.min_text_chars {
            return Err(VidraError::NoUsableText(format!(
                "No transcript or description available for video {}",
                video_id
            )));
        }

        info!(
            "Chunking text (size={}, overlap={})",
            chunk_size, chunk_overlap
        );
        let chunks = chunk_text(&text, chunk_size, chunk_overlap)?;
        if chunks.is_empty() {
            return Err(VidraError::ChunkProduction(format!(
                "No chunks produced from video {} content",
                video_id
            )));
        }
        info!("Created {} chunks", chunks.len());

        let embeddings = self.embedder.embed_batch(&chunks).await?;

        let metadata = CollectionMetadata {
            title: video.title.clone(),
            channel: video.channel.clone(),
        };
        self.store
            .get_or_create_collection(&video_id, &metadata)
            .await?;

        let total_chunks = chunks.len() as u32;
        let stored: Vec<StoredChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (text, embedding))| StoredChunk {
                id: format!("chunk_{}", i),
                text,
                embedding,
                metadata: ChunkMetadata {
                    video_id: video_id.clone(),
                    chunk_index: i as u32,
                    total_chunks,
                    upload_date: video.upload_date.clone(),
                    source_url: video.source_url.clone(),
                },
            })
            .collect();

        let chunk_count = self.store.insert_chunks(&video_id, &stored).await?;
        info!("Ingested video {} with {} chunks", video_id, chunk_count);

        Ok(IngestOutcome::Ingested {
            video_id,
            title: video.title,
            channel: video.channel,
            chunk_count,
        })
    }

    /// List all ingested videos.
    pub async fn list_videos(&self) -> Result<Vec<CollectionSummary>> {
        self.store.list_collections().await
    }

    /// Delete an ingested video's collection.
    ///
    /// Returns false when no collection exists for the ID.
    #[instrument(skip(self))]
    pub async fn delete(&self, video_id: &str) -> Result<bool> {
        self.store.delete_collection(video_id).await
    }
}
