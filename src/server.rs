//! HTTP adapter exposing the content store.
//!
//! A thin axum layer: request bodies mirror the facade's signatures, every
//! success uses the `{success, data, message}` envelope, and store errors
//! map to status codes (`NotFound` → 404, embedding failures → 502). Store
//! operations run through `spawn_blocking` because the embedding call may
//! block on a remote provider.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::CorpusConfig;
use crate::content::error::StoreError;
use crate::content::history::AnalyticsOptions;
use crate::content::search::SearchOptions;
use crate::content::store::ContentStore;
use crate::embedding;

#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<ContentStore>>,
    config: Arc<CorpusConfig>,
}

/// Build the store from config and serve until ctrl-c.
pub async fn serve(config: CorpusConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let provider = embedding::create_provider(&config.embedding)?;
    let store = ContentStore::new(Arc::from(provider));
    tracing::info!(
        provider = %config.embedding.provider,
        model = %config.embedding.model,
        dimensions = config.embedding.dimensions,
        "content store ready"
    );

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "content store listening at http://{bind_addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/content", post(store_content))
        .route(
            "/content/{id}",
            get(get_content).put(update_content).delete(delete_content),
        )
        .route("/search", post(search))
        .route("/analytics", get(analytics))
        .with_state(state)
}

// ── Request/response shapes ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct ContentRequest {
    payload: Value,
    metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    query: String,
    limit: Option<usize>,
    threshold: Option<f64>,
    content_type: Option<String>,
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct AnalyticsParams {
    #[serde(rename = "timeRangeDays")]
    time_range_days: Option<i64>,
}

#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    data: T,
    message: String,
}

impl<T: Serialize> Envelope<T> {
    fn ok(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            message: message.into(),
        })
    }
}

enum ApiError {
    Store(StoreError),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Store(StoreError::NotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("content not found: {id}"))
            }
            ApiError::Store(err @ StoreError::Embedding(_)) => {
                tracing::error!(%err, "store operation failed");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            ApiError::Internal(message) => {
                tracing::error!(%message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        let body = serde_json::json!({ "success": false, "error": error });
        (status, Json(body)).into_response()
    }
}

/// Run a store operation on the blocking pool under the store mutex.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut ContentStore) -> Result<T, ApiError> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || {
        let mut store = store
            .lock()
            .map_err(|_| ApiError::Internal("store lock poisoned".into()))?;
        op(&mut store)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "corpus content store",
    }))
}

async fn store_content(
    State(state): State<AppState>,
    Json(request): Json<ContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = with_store(&state, move |store| {
        Ok(store.store(request.payload, request.metadata)?)
    })
    .await?;
    Ok(Envelope::ok(receipt, "content stored"))
}

async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = with_store(&state, move |store| {
        Ok(store.update(&id, request.payload, request.metadata)?)
    })
    .await?;
    Ok(Envelope::ok(receipt, "content updated"))
}

async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let document = with_store(&state, move |store| {
        store
            .get_by_id(&id)
            .cloned()
            .ok_or_else(|| ApiError::Store(StoreError::NotFound(id.clone())))
    })
    .await?;
    Ok(Envelope::ok(document, "content retrieved"))
}

async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let receipt = with_store(&state, move |store| Ok(store.delete(&id))).await?;
    Ok(Envelope::ok(receipt, "content deleted"))
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let SearchRequest {
        query,
        limit,
        threshold,
        content_type,
        user_id,
    } = request;
    let options = SearchOptions {
        limit: limit.unwrap_or(state.config.search.default_limit),
        threshold: threshold.unwrap_or(state.config.search.default_threshold),
        content_type,
        user_id,
    };

    let response = with_store(&state, move |store| Ok(store.search(&query, &options)?)).await?;
    Ok(Envelope::ok(response, "search completed"))
}

async fn analytics(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let options = AnalyticsOptions {
        time_range_days: params
            .time_range_days
            .unwrap_or(state.config.analytics.default_window_days),
    };
    let report = with_store(&state, move |store| Ok(store.analytics(&options))).await?;
    Ok(Envelope::ok(report, "analytics generated"))
}
