//! Write and query paths over the repository, embedding provider, and
//! search history ledger.
//!
//! [`ContentStore`] is an owned value with no global state: construct one
//! per process and inject it into callers. Write operations embed first and
//! mutate second, so a provider failure never leaves a document stored
//! without its embedding or with a stale one.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::error::StoreError;
use super::extract;
use super::history::{AnalyticsOptions, AnalyticsReport, SearchHistory};
use super::repository::ContentRepository;
use super::search::{self, SearchOptions, SearchResponse};
use super::types::{
    embedding_record_id, ContentDocument, ContentStatus, EmbeddingRecord, RecordedSearchParams,
};
use crate::embedding::EmbeddingProvider;

/// Receipt returned from [`ContentStore::store`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreReceipt {
    pub content_id: String,
    pub vector_id: String,
    pub embedding_id: String,
    pub dimensions: usize,
    pub stored_at: String,
}

/// Receipt returned from [`ContentStore::update`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReceipt {
    pub content_id: String,
    pub updated_at: String,
    pub dimensions: usize,
}

/// Receipt returned from [`ContentStore::delete`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReceipt {
    pub content_id: String,
    pub deleted_at: String,
}

/// The semantic content store.
pub struct ContentStore {
    repository: ContentRepository,
    history: SearchHistory,
    provider: Arc<dyn EmbeddingProvider>,
}

impl ContentStore {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            repository: ContentRepository::new(),
            history: SearchHistory::new(),
            provider,
        }
    }

    /// Store a new content document.
    ///
    /// Derives searchable text from the payload, embeds it, and writes the
    /// document together with its embedding record. The content id comes
    /// from `payload.data.contentId` when supplied, otherwise a UUID v7 is
    /// assigned; storing an id that already exists replaces the document.
    pub fn store(
        &mut self,
        payload: Value,
        metadata: Option<Map<String, Value>>,
    ) -> Result<StoreReceipt, StoreError> {
        let extracted = extract::extract(&payload);
        let embedding = self
            .provider
            .embed(&extracted.searchable_text)
            .map_err(StoreError::Embedding)?;

        let content_id = extracted
            .content_id
            .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());
        let content_type = extracted
            .content_type
            .or_else(|| {
                metadata
                    .as_ref()
                    .and_then(|m| m.get("contentType"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "unknown".to_string());

        let now = Utc::now().to_rfc3339();
        let mut doc_metadata = metadata.unwrap_or_default();
        stamp_embedding_info(&mut doc_metadata, &embedding.model, embedding.dimensions);

        let document = ContentDocument {
            id: content_id.clone(),
            content_type,
            title: extracted.title,
            payload,
            searchable_text: extracted.searchable_text,
            embedding: embedding.vector,
            metadata: doc_metadata,
            status: ContentStatus::Active,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        self.repository.upsert(document, self.provider.model());

        info!(
            content_id = %content_id,
            dimensions = embedding.dimensions,
            tokens = embedding.token_estimate,
            "content stored"
        );

        Ok(StoreReceipt {
            vector_id: format!("vector_{content_id}"),
            embedding_id: embedding_record_id(&content_id),
            content_id,
            dimensions: embedding.dimensions,
            stored_at: now,
        })
    }

    /// Re-derive text and embedding for an existing document, merging
    /// metadata. Identity, status, and creation time are preserved.
    pub fn update(
        &mut self,
        content_id: &str,
        payload: Value,
        metadata_patch: Option<Map<String, Value>>,
    ) -> Result<UpdateReceipt, StoreError> {
        let mut document = match self.repository.get(content_id) {
            Some(existing) => existing.clone(),
            None => return Err(StoreError::NotFound(content_id.to_string())),
        };

        let extracted = extract::extract(&payload);
        let embedding = self
            .provider
            .embed(&extracted.searchable_text)
            .map_err(StoreError::Embedding)?;

        let now = Utc::now().to_rfc3339();
        document.payload = payload;
        document.searchable_text = extracted.searchable_text;
        document.embedding = embedding.vector;
        document.title = extracted.title;
        if let Some(content_type) = extracted.content_type {
            document.content_type = content_type;
        }
        if let Some(patch) = metadata_patch {
            for (key, value) in patch {
                document.metadata.insert(key, value);
            }
        }
        stamp_embedding_info(&mut document.metadata, &embedding.model, embedding.dimensions);
        document.updated_at = now.clone();

        self.repository.upsert(document, self.provider.model());

        info!(content_id, dimensions = embedding.dimensions, "content updated");

        Ok(UpdateReceipt {
            content_id: content_id.to_string(),
            updated_at: now,
            dimensions: embedding.dimensions,
        })
    }

    /// Remove a document and its embedding record.
    ///
    /// Idempotent: deleting an id that does not exist still returns a
    /// receipt.
    pub fn delete(&mut self, content_id: &str) -> DeleteReceipt {
        if self.repository.remove(content_id).is_some() {
            info!(content_id, "content deleted");
        } else {
            debug!(content_id, "delete of unknown id ignored");
        }
        DeleteReceipt {
            content_id: content_id.to_string(),
            deleted_at: Utc::now().to_rfc3339(),
        }
    }

    /// Pure lookup, no side effects. A missing id is `None`, not an error,
    /// so read paths branch without error handling.
    pub fn get_by_id(&self, content_id: &str) -> Option<&ContentDocument> {
        self.repository.get(content_id)
    }

    /// Embed the query, scan and rank the repository, and record the search
    /// in the history ledger.
    pub fn search(
        &mut self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, StoreError> {
        let embedding = self.provider.embed(query).map_err(StoreError::Embedding)?;
        let (results, total_results) = search::rank(&self.repository, &embedding.vector, options);

        // Recording happens after the results are assembled and cannot fail
        // the search.
        let user_id = options.user_id.as_deref().unwrap_or("anonymous");
        self.history.append(
            query,
            user_id,
            results.len(),
            RecordedSearchParams {
                threshold: options.threshold,
                content_type: options.content_type.clone(),
                model: embedding.model,
            },
        );

        debug!(query, total_results, returned = results.len(), "search executed");

        Ok(SearchResponse {
            query: query.to_string(),
            results,
            total_results,
            searched_at: Utc::now().to_rfc3339(),
            query_embedding: embedding.vector,
        })
    }

    /// Aggregate search analytics over a trailing window.
    pub fn analytics(&self, options: &AnalyticsOptions) -> AnalyticsReport {
        self.history.report(options)
    }

    /// Embedding record for a stored document, if any.
    pub fn embedding_record(&self, content_id: &str) -> Option<&EmbeddingRecord> {
        self.repository.embedding_record(content_id)
    }

    pub fn document_count(&self) -> usize {
        self.repository.len()
    }

    pub fn search_count(&self) -> usize {
        self.history.len()
    }
}

/// Stamp the provider's model and dimensionality into document metadata.
fn stamp_embedding_info(metadata: &mut Map<String, Value>, model: &str, dimensions: usize) {
    metadata.insert("embeddingModel".into(), Value::from(model));
    metadata.insert("dimensions".into(), Value::from(dimensions as u64));
}
