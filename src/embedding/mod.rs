//! Text-to-vector boundary.
//!
//! Provides the [`VectorProvider`] trait that the matching core calls to embed text,
//! the [`ProviderError`] taxonomy it reports failures with, and an OpenAI-compatible
//! HTTP implementation created via [`create_provider`] from configuration.

pub mod openai;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// Failure to obtain a vector for one piece of text.
///
/// `Clone` so that a single failed fetch can be reported to every caller that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("quota exceeded: {0}")]
    Quota(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no API key configured (set OPENAI_TOKEN or embedding.api_key)")]
    MissingApiKey,
}

/// Trait for embedding text into vectors.
///
/// Implementations return a fixed-length vector per call. Latency, retries and
/// timeouts belong to the implementation; callers treat every call as fallible.
#[async_trait]
pub trait VectorProvider: Send + Sync {
    /// Embed a single text string into a vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Create a vector provider from config.
///
/// Currently only `"openai"` is supported (any OpenAI-compatible `/embeddings` endpoint).
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn VectorProvider>> {
    match config.provider.as_str() {
        "openai" => {
            let provider = openai::OpenAiProvider::new(config)?;
            Ok(Box::new(provider))
        }
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: openai"),
    }
}
