//! Similarity scoring and ranking over the repository.
//!
//! Deliberately a linear scan: every candidate is scored with exact cosine
//! similarity, filtered by threshold and content type, sorted, and cut to
//! the result limit. Ties are broken by content id, ascending, so rankings
//! are deterministic regardless of map iteration order.

use serde::Serialize;
use serde_json::{Map, Value};

use super::repository::ContentRepository;
use super::truncate_chars;
use super::types::PREVIEW_CHARS;

/// Knobs for a single search call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of results returned.
    pub limit: usize,
    /// Results must score *strictly* above this.
    pub threshold: f64,
    /// When set, only documents with this content type are scored.
    pub content_type: Option<String>,
    /// Recorded in search history; `"anonymous"` when unset.
    pub user_id: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            threshold: 0.7,
            content_type: None,
            user_id: None,
        }
    }
}

/// A ranked search result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub content_id: String,
    pub title: String,
    pub content_type: String,
    pub metadata: Map<String, Value>,
    /// First [`PREVIEW_CHARS`] characters of the searchable text.
    pub preview: String,
    pub similarity: f64,
}

/// Response from a search call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    /// Matches above the threshold, before the limit cut.
    pub total_results: usize,
    pub searched_at: String,
    pub query_embedding: Vec<f32>,
}

/// Cosine similarity between two vectors: `dot(a,b) / (|a| * |b|)`.
///
/// Returns 0.0 when either vector has zero norm or when the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Scan the repository and return ranked hits plus the pre-limit match count.
pub fn rank(
    repository: &ContentRepository,
    query_embedding: &[f32],
    options: &SearchOptions,
) -> (Vec<SearchHit>, usize) {
    let mut hits: Vec<SearchHit> = Vec::new();

    for document in repository.documents() {
        if let Some(wanted) = &options.content_type {
            if &document.content_type != wanted {
                continue;
            }
        }

        let similarity = cosine_similarity(query_embedding, &document.embedding);
        if similarity > options.threshold {
            hits.push(SearchHit {
                content_id: document.id.clone(),
                title: document.title.clone(),
                content_type: document.content_type.clone(),
                metadata: document.metadata.clone(),
                preview: preview(&document.searchable_text),
                similarity,
            });
        }
    }

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.content_id.cmp(&b.content_id))
    });

    let total = hits.len();
    hits.truncate(options.limit);
    (hits, total)
}

/// First [`PREVIEW_CHARS`] characters of the searchable text plus an
/// ellipsis.
fn preview(text: &str) -> String {
    format!("{}...", truncate_chars(text, PREVIEW_CHARS))
}
