//! Vidra - Grounded Q&A for YouTube Videos
//!
//! A local-first CLI tool for asking questions about YouTube videos and getting
//! answers grounded in the video's own text, with cited source locations.
//!
//! # Overview
//!
//! Vidra allows you to:
//! - Ingest a YouTube video's text into a local vector database
//! - Ask questions and get AI answers grounded in that video only
//! - See which parts of the video each answer came from
//! - Fall back to raw retrieved context when no generation backend is available
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `video_source` - Video metadata/text fetching (YouTube via yt-dlp)
//! - `chunking` - Sentence-aware text chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Per-video vector collections
//! - `generation` - Generative backend abstraction
//! - `ingest` - Ingestion pipeline coordination
//! - `rag` - Retrieval-augmented answering engine
//!
//! # Example
//!
//! ```rust,no_run
//! use vidra::config::Settings;
//! use vidra::ingest::IngestPipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let pipeline = IngestPipeline::new(&settings)?;
//!
//!     // Ingest a video by URL or bare ID
//!     let outcome = pipeline.process("dQw4w9WgXcQ", 500, 50).await?;
//!     println!("{:?}", outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod ingest;
pub mod openai;
pub mod rag;
pub mod vector_store;
pub mod video_source;

pub use error::{Result, VidraError};
