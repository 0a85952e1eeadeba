//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine distance computed in Rust for simplicity.
//! For production use cases with large datasets, consider using sqlite-vec
//! extension or a dedicated vector database.

use super::{
    cosine_distance, ChunkMetadata, CollectionMetadata, CollectionSummary, ScoredChunk,
    StoredChunk, VectorStore,
};
use crate::error::{Result, VidraError};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS collections (
        video_id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        channel TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS chunks (
        video_id TEXT NOT NULL,
        chunk_id TEXT NOT NULL,
        chunk_index INTEGER NOT NULL,
        total_chunks INTEGER NOT NULL,
        text TEXT NOT NULL,
        embedding BLOB NOT NULL,
        upload_date TEXT,
        source_url TEXT NOT NULL,
        PRIMARY KEY (video_id, chunk_id)
    );

    CREATE INDEX IF NOT EXISTS idx_chunks_video_id ON chunks(video_id);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Create a new SQLite vector store.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| VidraError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn collection_exists(conn: &Connection, video_id: &str) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM collections WHERE video_id = ?1",
            params![video_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, metadata))]
    async fn get_or_create_collection(
        &self,
        video_id: &str,
        metadata: &CollectionMetadata,
    ) -> Result<()> {
        let conn = self.lock()?;

        // OR IGNORE keeps the original row, sealing metadata at creation.
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO collections (video_id, title, channel, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                video_id,
                metadata.title,
                metadata.channel,
                Utc::now().to_rfc3339(),
            ],
        )?;

        if inserted > 0 {
            info!("Created collection for video {}", video_id);
        } else {
            debug!("Reusing existing collection for video {}", video_id);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn collection_exists_with_data(&self, video_id: &str) -> Result<bool> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE video_id = ?1",
            params![video_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    async fn insert_chunks(&self, video_id: &str, chunks: &[StoredChunk]) -> Result<usize> {
        let conn = self.lock()?;

        if !Self::collection_exists(&conn, video_id)? {
            return Err(VidraError::VectorStore(format!(
                "Cannot insert chunks: no collection for video '{}'",
                video_id
            )));
        }

        let tx = conn.unchecked_transaction()?;

        for chunk in chunks {
            let embedding_bytes = Self::embedding_to_bytes(&chunk.embedding);

            // Plain INSERT: a duplicate chunk_id aborts the transaction, so
            // the whole batch lands or nothing does.
            tx.execute(
                r#"
                INSERT INTO chunks
                (video_id, chunk_id, chunk_index, total_chunks, text, embedding, upload_date, source_url)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    video_id,
                    chunk.id,
                    chunk.metadata.chunk_index,
                    chunk.metadata.total_chunks,
                    chunk.text,
                    embedding_bytes,
                    chunk.metadata.upload_date,
                    chunk.metadata.source_url,
                ],
            )?;
        }

        tx.commit()?;
        info!("Inserted {} chunks for video {}", chunks.len(), video_id);
        Ok(chunks.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn query(
        &self,
        video_id: &str,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let conn = self.lock()?;

        if !Self::collection_exists(&conn, video_id)? {
            return Err(VidraError::CollectionNotFound(video_id.to_string()));
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT chunk_index, total_chunks, text, embedding, upload_date, source_url
            FROM chunks
            WHERE video_id = ?1
            "#,
        )?;

        let rows = stmt.query_map(params![video_id], |row| {
            let embedding_bytes: Vec<u8> = row.get(3)?;
            Ok((
                ChunkMetadata {
                    video_id: video_id.to_string(),
                    chunk_index: row.get(0)?,
                    total_chunks: row.get(1)?,
                    upload_date: row.get(4)?,
                    source_url: row.get(5)?,
                },
                row.get::<_, String>(2)?,
                Self::bytes_to_embedding(&embedding_bytes),
            ))
        })?;

        let mut results: Vec<ScoredChunk> = rows
            .filter_map(|r| r.ok())
            .map(|(metadata, text, embedding)| ScoredChunk {
                text,
                metadata,
                distance: cosine_distance(query_embedding, &embedding),
            })
            .collect();

        if results.is_empty() {
            return Err(VidraError::CollectionEmpty(video_id.to_string()));
        }

        // Ascending distance; k clamped to available chunks by truncate.
        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        debug!("Query returned {} chunks for video {}", results.len(), video_id);
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT c.video_id, c.title, c.channel, COUNT(k.chunk_id) as chunk_count
            FROM collections c
            LEFT JOIN chunks k ON k.video_id = c.video_id
            GROUP BY c.video_id
            ORDER BY c.created_at DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(CollectionSummary {
                video_id: row.get(0)?,
                title: row.get(1)?,
                channel: row.get(2)?,
                chunk_count: row.get(3)?,
            })
        })?;

        let result: Vec<CollectionSummary> = rows.filter_map(|r| r.ok()).collect();
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn get_collection(&self, video_id: &str) -> Result<Option<CollectionSummary>> {
        let conn = self.lock()?;

        let summary = conn
            .query_row(
                r#"
                SELECT c.video_id, c.title, c.channel, COUNT(k.chunk_id) as chunk_count
                FROM collections c
                LEFT JOIN chunks k ON k.video_id = c.video_id
                WHERE c.video_id = ?1
                GROUP BY c.video_id
                "#,
                params![video_id],
                |row| {
                    Ok(CollectionSummary {
                        video_id: row.get(0)?,
                        title: row.get(1)?,
                        channel: row.get(2)?,
                        chunk_count: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(summary)
    }

    #[instrument(skip(self))]
    async fn delete_collection(&self, video_id: &str) -> Result<bool> {
        let conn = self.lock()?;

        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM chunks WHERE video_id = ?1", params![video_id])?;
        let deleted = tx.execute(
            "DELETE FROM collections WHERE video_id = ?1",
            params![video_id],
        )?;
        tx.commit()?;

        if deleted > 0 {
            info!("Deleted collection for video {}", video_id);
        }
        Ok(deleted > 0)
    }
}
