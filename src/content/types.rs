//! Core content store type definitions.
//!
//! Defines [`ContentDocument`] (the stored unit of content), its companion
//! [`EmbeddingRecord`] (the secondary index entry carrying the vector), and
//! [`SearchHistoryRecord`] (one append-only entry per executed search).

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Character budget for derived searchable text.
pub const SEARCHABLE_TEXT_BUDGET: usize = 8000;

/// Characters of searchable text shown in a search result preview.
pub const PREVIEW_CHARS: usize = 200;

/// Lifecycle flag for a stored document.
///
/// Documents are `Active` from creation until deleted; delete removes the
/// record outright, so no other state is ever observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Active,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored content document — the repository's primary index entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    /// Caller-supplied id, or a UUID v7 (time-sortable) assigned by the
    /// store. Immutable once created.
    pub id: String,
    /// Free-form content category tag (e.g. `"blog_post"`). Filterable.
    pub content_type: String,
    /// Display title. `"Untitled"` when the payload carries none.
    pub title: String,
    /// The original payload, stored opaquely and never interpreted outside
    /// searchable-text extraction.
    pub payload: Value,
    /// Flattened text derived from the payload, used for the embedding and
    /// for result previews. Capped at [`SEARCHABLE_TEXT_BUDGET`] chars.
    pub searchable_text: String,
    /// Embedding vector, always derived from the *current* searchable text.
    pub embedding: Vec<f32>,
    /// Auxiliary fields — tags, quality scores, embedding model identifier
    /// and dimensionality. Merged, never replaced, on update.
    pub metadata: Map<String, Value>,
    pub status: ContentStatus,
    /// RFC 3339 creation timestamp. Preserved across updates.
    pub created_at: String,
    /// RFC 3339 last-modification timestamp.
    pub updated_at: String,
}

/// Secondary index entry keyed by `embedding_<contentId>`.
///
/// Carries a copy of the vector and a light projection of the parent
/// document so embeddings can be enumerated without hydrating full
/// documents. Always written in the same repository call as its parent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingRecord {
    pub id: String,
    pub content_id: String,
    pub vector: Vec<f32>,
    pub content_type: String,
    pub title: String,
    pub dimensions: usize,
    pub model: String,
    pub updated_at: String,
}

/// Key of the [`EmbeddingRecord`] belonging to `content_id`.
pub fn embedding_record_id(content_id: &str) -> String {
    format!("embedding_{content_id}")
}

/// One append-only ledger entry per executed search. Never mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryRecord {
    /// UUID v7 primary key.
    pub id: String,
    /// The query text, verbatim.
    pub query: String,
    /// Caller identity, `"anonymous"` when not supplied.
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    /// Number of results actually returned (post-limit).
    pub results_count: usize,
    pub params: RecordedSearchParams,
}

/// The search parameters captured alongside a history record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedSearchParams {
    pub threshold: f64,
    pub content_type: Option<String>,
    pub model: String,
}
