#![allow(dead_code)]

use std::sync::Arc;

use corpus::config::EmbeddingConfig;
use corpus::content::store::ContentStore;
use corpus::embedding::hash::HashEmbeddingProvider;
use serde_json::{json, Value};

/// Dimensionality used across integration tests (smaller than production
/// for cheap vectors, large enough that unrelated texts stay near-orthogonal).
pub const TEST_DIMENSIONS: usize = 256;

/// Fresh store backed by the deterministic hash provider.
pub fn test_store() -> ContentStore {
    let config = EmbeddingConfig {
        model: "test-embedding".into(),
        dimensions: TEST_DIMENSIONS,
        ..EmbeddingConfig::default()
    };
    ContentStore::new(Arc::new(HashEmbeddingProvider::new(&config)))
}

/// Payload in the content generator's well-known shape.
pub fn article_payload(title: &str, summary: &str) -> Value {
    json!({
        "data": {
            "title": title,
            "summary": summary,
            "contentType": "blog_post",
        }
    })
}

/// The searchable text the store derives from [`article_payload`] —
/// title and summary joined in extraction order.
pub fn article_text(title: &str, summary: &str) -> String {
    format!("{title} {summary}")
}

/// Store an article payload, returning its content id.
pub fn store_article(store: &mut ContentStore, title: &str, summary: &str) -> String {
    store
        .store(article_payload(title, summary), None)
        .unwrap()
        .content_id
}
