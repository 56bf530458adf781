//! Keyed in-memory storage for content documents and embedding records.
//!
//! Two indices: documents by content id, and [`EmbeddingRecord`]s keyed
//! `embedding_<contentId>`. Both indices are written in the same call so a
//! document and its vector projection cannot drift apart.

use std::collections::HashMap;

use super::types::{embedding_record_id, ContentDocument, EmbeddingRecord};

/// Plain in-memory repository. No capacity limit, no locking — the owning
/// [`ContentStore`](super::store::ContentStore) is wrapped by the host when
/// concurrent access is needed.
#[derive(Debug, Default)]
pub struct ContentRepository {
    documents: HashMap<String, ContentDocument>,
    embeddings: HashMap<String, EmbeddingRecord>,
}

impl ContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document, refreshing its embedding record from
    /// the document's current vector and projection fields.
    pub fn upsert(&mut self, document: ContentDocument, model: &str) {
        let record = EmbeddingRecord {
            id: embedding_record_id(&document.id),
            content_id: document.id.clone(),
            vector: document.embedding.clone(),
            content_type: document.content_type.clone(),
            title: document.title.clone(),
            dimensions: document.embedding.len(),
            model: model.to_string(),
            updated_at: document.updated_at.clone(),
        };
        self.embeddings.insert(record.id.clone(), record);
        self.documents.insert(document.id.clone(), document);
    }

    pub fn get(&self, content_id: &str) -> Option<&ContentDocument> {
        self.documents.get(content_id)
    }

    /// Remove a document and its embedding record. Returns the document,
    /// or `None` if the id was never stored.
    pub fn remove(&mut self, content_id: &str) -> Option<ContentDocument> {
        self.embeddings.remove(&embedding_record_id(content_id));
        self.documents.remove(content_id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &ContentDocument> {
        self.documents.values()
    }

    pub fn embedding_record(&self, content_id: &str) -> Option<&EmbeddingRecord> {
        self.embeddings.get(&embedding_record_id(content_id))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::ContentStatus;
    use serde_json::{json, Map};

    fn document(id: &str, embedding: Vec<f32>) -> ContentDocument {
        ContentDocument {
            id: id.to_string(),
            content_type: "blog_post".into(),
            title: "Title".into(),
            payload: json!({"data": {"title": "Title"}}),
            searchable_text: "Title".into(),
            embedding,
            metadata: Map::new(),
            status: ContentStatus::Active,
            created_at: "2026-01-01T00:00:00+00:00".into(),
            updated_at: "2026-01-01T00:00:00+00:00".into(),
        }
    }

    #[test]
    fn upsert_writes_both_indices() {
        let mut repo = ContentRepository::new();
        repo.upsert(document("doc-1", vec![1.0, 0.0]), "test-model");

        assert_eq!(repo.len(), 1);
        assert!(repo.get("doc-1").is_some());

        let record = repo.embedding_record("doc-1").unwrap();
        assert_eq!(record.id, "embedding_doc-1");
        assert_eq!(record.content_id, "doc-1");
        assert_eq!(record.vector, vec![1.0, 0.0]);
        assert_eq!(record.dimensions, 2);
        assert_eq!(record.model, "test-model");
    }

    #[test]
    fn upsert_refreshes_embedding_record() {
        let mut repo = ContentRepository::new();
        repo.upsert(document("doc-1", vec![1.0, 0.0]), "test-model");
        repo.upsert(document("doc-1", vec![0.0, 1.0]), "test-model");

        assert_eq!(repo.len(), 1);
        let record = repo.embedding_record("doc-1").unwrap();
        assert_eq!(record.vector, vec![0.0, 1.0]);
    }

    #[test]
    fn remove_clears_both_indices() {
        let mut repo = ContentRepository::new();
        repo.upsert(document("doc-1", vec![1.0]), "test-model");

        let removed = repo.remove("doc-1");
        assert!(removed.is_some());
        assert!(repo.is_empty());
        assert!(repo.get("doc-1").is_none());
        assert!(repo.embedding_record("doc-1").is_none());
    }

    #[test]
    fn remove_missing_id_returns_none() {
        let mut repo = ContentRepository::new();
        assert!(repo.remove("ghost").is_none());
    }
}
