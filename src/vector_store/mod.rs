//! Vector store abstraction for Vidra.
//!
//! Persisted chunk data is keyed by video: each ingested video owns one
//! collection, immutable once populated, removable only as a whole.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Collection-level metadata, sealed when the collection is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMetadata {
    /// Video title.
    pub title: String,
    /// Channel name.
    pub channel: String,
}

/// Summary of one collection, for listing and lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Video ID.
    pub video_id: String,
    /// Video title.
    pub title: String,
    /// Channel name.
    pub channel: String,
    /// Number of stored chunks.
    pub chunk_count: u32,
}

/// Position metadata carried by every chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Video this chunk belongs to.
    pub video_id: String,
    /// 0-based position in the original text; contiguous within a collection.
    pub chunk_index: u32,
    /// Total chunks in the collection.
    pub total_chunks: u32,
    /// Upload date of the source video, if known.
    pub upload_date: Option<String>,
    /// URL the text was fetched from.
    pub source_url: String,
}

/// A chunk ready for storage: text, embedding, and position metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Chunk ID, stable within the collection (e.g. "chunk_0").
    pub id: String,
    /// Text content; never empty or whitespace-only.
    pub text: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// Position metadata.
    pub metadata: ChunkMetadata,
}

/// A query match with its distance to the query vector.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Text content of the matched chunk.
    pub text: String,
    /// Position metadata of the matched chunk.
    pub metadata: ChunkMetadata,
    /// Cosine distance (1 - similarity); lower is more relevant.
    pub distance: f32,
}

/// Trait for vector store implementations, keyed by video ID.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create the collection for a video, or reuse it if present.
    ///
    /// Idempotent; metadata is sealed at creation and not updated on reuse.
    async fn get_or_create_collection(
        &self,
        video_id: &str,
        metadata: &CollectionMetadata,
    ) -> Result<()>;

    /// True iff the collection exists and holds at least one chunk.
    async fn collection_exists_with_data(&self, video_id: &str) -> Result<bool>;

    /// Bulk insert chunks, all-or-nothing.
    ///
    /// Chunk IDs must be unique within the collection; a duplicate fails the
    /// whole insert.
    async fn insert_chunks(&self, video_id: &str, chunks: &[StoredChunk]) -> Result<usize>;

    /// Query the collection's `k` nearest chunks, ascending by distance.
    ///
    /// `k` is clamped to the stored chunk count. A missing collection is
    /// `CollectionNotFound`; an existing but empty one is `CollectionEmpty`.
    async fn query(
        &self,
        video_id: &str,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>>;

    /// List all collections.
    async fn list_collections(&self) -> Result<Vec<CollectionSummary>>;

    /// Look up one collection's summary.
    async fn get_collection(&self, video_id: &str) -> Result<Option<CollectionSummary>>;

    /// Delete a collection and all its chunks atomically.
    ///
    /// Returns false, not an error, when the collection does not exist.
    async fn delete_collection(&self, video_id: &str) -> Result<bool>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Cosine distance: 1 - similarity. Zero for identical directions, up to 2.0
/// for opposite ones.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}
