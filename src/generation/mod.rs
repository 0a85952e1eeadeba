//! Generative backend abstraction.
//!
//! The answering engine treats text generation as a remote collaborator that
//! may be absent or failing; retrieval output survives either way.

mod openai;

pub use openai::OpenAIGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Sampling parameters and content for a single generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The full user prompt, context included.
    pub prompt: String,
    /// System instruction constraining the answer.
    pub system: String,
    /// Sampling temperature (lower = more factual).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// Trait for generative text backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Probe whether the backend is reachable and usable.
    ///
    /// Called before committing to generation so an unreachable backend
    /// degrades to a context-only answer instead of failing the call.
    async fn is_available(&self) -> bool;

    /// Generate text for the given request.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Name of the model this generator uses.
    fn model(&self) -> &str;
}
