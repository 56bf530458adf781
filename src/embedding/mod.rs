//! Text-to-vector embedding pipeline.
//!
//! Provides the [`EmbeddingProvider`] trait and two implementations: a
//! deterministic hash-based provider ([`hash`]) and an OpenAI-compatible
//! HTTP provider ([`remote`]). The provider is created via
//! [`create_provider`] from configuration.

pub mod hash;
pub mod remote;

use anyhow::Result;

/// Default vector dimensionality (text-embedding-ada-002).
pub const DEFAULT_DIMENSIONS: usize = 1536;

/// A computed embedding plus the metadata reported alongside it.
#[derive(Debug, Clone)]
pub struct Embedding {
    /// Vector of exactly `dimensions` components, each in `[-1, 1]`.
    pub vector: Vec<f32>,
    /// Identifier of the model that produced the vector.
    pub model: String,
    /// Declared dimensionality, always equal to `vector.len()`.
    pub dimensions: usize,
    /// Rough token count of the input, used only for reporting.
    pub token_estimate: usize,
}

/// Trait for embedding text into vectors.
///
/// Implementations produce vectors of exactly [`EmbeddingProvider::dimensions`]
/// components and are deterministic for identical input text. All methods are
/// synchronous — callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    fn embed(&self, text: &str) -> Result<Embedding>;

    /// Number of dimensions this provider produces.
    fn dimensions(&self) -> usize;

    /// Identifier of the embedding model in use.
    fn model(&self) -> &str;
}

/// Rough token estimate at ~4 characters per token.
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

/// Create an embedding provider from config.
///
/// `"hash"` is the deterministic local provider; `"remote"` talks to an
/// OpenAI-compatible embeddings endpoint.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "hash" => Ok(Box::new(hash::HashEmbeddingProvider::new(config))),
        "remote" => {
            let provider = remote::RemoteEmbeddingProvider::new(config)?;
            Ok(Box::new(provider))
        }
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: hash, remote"),
    }
}
