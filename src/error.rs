//! Error types for Vidra.

use thiserror::Error;

/// Library-level error type for Vidra operations.
#[derive(Error, Debug)]
pub enum VidraError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Video source error: {0}")]
    VideoSource(String),

    #[error("No usable text for video: {0}")]
    NoUsableText(String),

    #[error("Failed to create chunks: {0}")]
    ChunkProduction(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Video '{0}' not found. Please process the video first.")]
    CollectionNotFound(String),

    #[error("Video '{0}' has no indexed content.")]
    CollectionEmpty(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Vidra operations.
pub type Result<T> = std::result::Result<T, VidraError>;
