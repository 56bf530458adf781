//! Error types for store operations.

use thiserror::Error;

/// Errors surfaced by store operations.
///
/// `NotFound` and `Embedding` stay distinct so HTTP callers can map them to
/// 404 and 5xx respectively. Reads return `Option` instead of `NotFound`,
/// so lookups branch without error handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation addressed a content id that does not exist.
    #[error("content not found: {0}")]
    NotFound(String),

    /// The embedding call failed or timed out. No partial write happens:
    /// the targeted document is left exactly as it was.
    #[error("embedding provider failed: {0}")]
    Embedding(#[source] anyhow::Error),
}
