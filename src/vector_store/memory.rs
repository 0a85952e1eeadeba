//! In-memory vector store implementation.
//!
//! Useful for testing and ephemeral sessions.

use super::{
    cosine_distance, CollectionMetadata, CollectionSummary, ScoredChunk, StoredChunk, VectorStore,
};
use crate::error::{Result, VidraError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

struct Collection {
    metadata: CollectionMetadata,
    chunks: Vec<StoredChunk>,
}

/// In-memory vector store.
pub struct MemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn get_or_create_collection(
        &self,
        video_id: &str,
        metadata: &CollectionMetadata,
    ) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        collections
            .entry(video_id.to_string())
            .or_insert_with(|| Collection {
                metadata: metadata.clone(),
                chunks: Vec::new(),
            });
        Ok(())
    }

    async fn collection_exists_with_data(&self, video_id: &str) -> Result<bool> {
        let collections = self.collections.read().unwrap();
        Ok(collections
            .get(video_id)
            .is_some_and(|c| !c.chunks.is_empty()))
    }

    async fn insert_chunks(&self, video_id: &str, chunks: &[StoredChunk]) -> Result<usize> {
        let mut collections = self.collections.write().unwrap();
        let collection = collections.get_mut(video_id).ok_or_else(|| {
            VidraError::VectorStore(format!(
                "Cannot insert chunks: no collection for video '{}'",
                video_id
            ))
        })?;

        // Validate the whole batch before touching the collection.
        for chunk in chunks {
            let duplicate = collection.chunks.iter().any(|c| c.id == chunk.id)
                || chunks.iter().filter(|c| c.id == chunk.id).count() > 1;
            if duplicate {
                return Err(VidraError::VectorStore(format!(
                    "Duplicate chunk id '{}' in collection '{}'",
                    chunk.id, video_id
                )));
            }
        }

        collection.chunks.extend_from_slice(chunks);
        Ok(chunks.len())
    }

    async fn query(
        &self,
        video_id: &str,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let collections = self.collections.read().unwrap();
        let collection = collections
            .get(video_id)
            .ok_or_else(|| VidraError::CollectionNotFound(video_id.to_string()))?;

        if collection.chunks.is_empty() {
            return Err(VidraError::CollectionEmpty(video_id.to_string()));
        }

        let mut results: Vec<ScoredChunk> = collection
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                text: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                distance: cosine_distance(query_embedding, &chunk.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    async fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        let collections = self.collections.read().unwrap();

        let mut summaries: Vec<CollectionSummary> = collections
            .iter()
            .map(|(video_id, collection)| CollectionSummary {
                video_id: video_id.clone(),
                title: collection.metadata.title.clone(),
                channel: collection.metadata.channel.clone(),
                chunk_count: collection.chunks.len() as u32,
            })
            .collect();

        summaries.sort_by(|a, b| a.video_id.cmp(&b.video_id));
        Ok(summaries)
    }

    async fn get_collection(&self, video_id: &str) -> Result<Option<CollectionSummary>> {
        let collections = self.collections.read().unwrap();
        Ok(collections.get(video_id).map(|collection| CollectionSummary {
            video_id: video_id.to_string(),
            title: collection.metadata.title.clone(),
            channel: collection.metadata.channel.clone(),
            chunk_count: collection.chunks.len() as u32,
        }))
    }

    async fn delete_collection(&self, video_id: &str) -> Result<bool> {
        let mut collections = self.collections.write().unwrap();
        Ok(collections.remove(video_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::ChunkMetadata;

    fn chunk(index: u32, text: &str, embedding: Vec<f32>) -> StoredChunk {
        StoredChunk {
            id: format!("chunk_{}", index),
            text: text.to_string(),
            embedding,
            metadata: ChunkMetadata {
                video_id: "vid1".to_string(),
                chunk_index: index,
                total_chunks: 2,
                upload_date: None,
                source_url: "https://www.youtube.com/watch?v=vid1".to_string(),
            },
        }
    }

    fn metadata() -> CollectionMetadata {
        CollectionMetadata {
            title: "Memory Test".to_string(),
            channel: "Channel".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_store_basics() {
        let store = MemoryVectorStore::new();
        store
            .get_or_create_collection("vid1", &metadata())
            .await
            .unwrap();

        assert!(!store.collection_exists_with_data("vid1").await.unwrap());

        store
            .insert_chunks(
                "vid1",
                &[
                    chunk(0, "hello world", vec![1.0, 0.0, 0.0]),
                    chunk(1, "goodbye world", vec![0.0, 1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        assert!(store.collection_exists_with_data("vid1").await.unwrap());

        let results = store.query("vid1", &[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].distance < results[1].distance);
        assert_eq!(results[0].text, "hello world");

        assert!(store.delete_collection("vid1").await.unwrap());
        assert!(!store.delete_collection("vid1").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_rejects_duplicates() {
        let store = MemoryVectorStore::new();
        store
            .get_or_create_collection("vid1", &metadata())
            .await
            .unwrap();
        store
            .insert_chunks("vid1", &[chunk(0, "first", vec![1.0])])
            .await
            .unwrap();

        let err = store
            .insert_chunks("vid1", &[chunk(0, "dupe", vec![1.0])])
            .await
            .unwrap_err();
        assert!(matches!(err, VidraError::VectorStore(_)));

        // Original content untouched.
        let results = store.query("vid1", &[1.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "first");
    }

    #[tokio::test]
    async fn test_memory_store_not_found_vs_empty() {
        let store = MemoryVectorStore::new();
        let err = store.query("missing", &[1.0], 1).await.unwrap_err();
        assert!(matches!(err, VidraError::CollectionNotFound(_)));

        store
            .get_or_create_collection("empty", &metadata())
            .await
            .unwrap();
        let err = store.query("empty", &[1.0], 1).await.unwrap_err();
        assert!(matches!(err, VidraError::CollectionEmpty(_)));
    }
}
