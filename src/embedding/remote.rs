//! OpenAI-compatible HTTP embedding provider.
//!
//! Sends `POST {endpoint}/embeddings` and maps the response into an
//! [`Embedding`]. Requests carry the configured timeout; transport and
//! response-shape failures surface as errors to the calling store operation,
//! which performs no retries of its own.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{estimate_tokens, Embedding, EmbeddingProvider};
use crate::config::EmbeddingConfig;

/// Remote embedding provider speaking the OpenAI embeddings wire format.
pub struct RemoteEmbeddingProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingsEntry>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddingsEntry {
    embedding: Vec<f32>,
}

impl RemoteEmbeddingProvider {
    /// Build a provider from config. The API key is read from the
    /// environment variable named by `api_key_env`; requests go out
    /// unauthenticated when it is unset (e.g. a local inference server).
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build embedding http client")?;

        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            tracing::warn!(var = %config.api_key_env, "no API key in environment; sending unauthenticated requests");
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }
}

impl EmbeddingProvider for RemoteEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Embedding> {
        let url = format!("{}/embeddings", self.endpoint);
        let mut request = self.client.post(&url).json(&serde_json::json!({
            "model": self.model,
            "input": text,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .context("embedding request failed")?
            .error_for_status()
            .context("embedding request rejected")?;

        let body: EmbeddingsResponse = response
            .json()
            .context("malformed embedding response")?;

        let vector = body
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .context("embedding response contained no vectors")?;

        anyhow::ensure!(
            vector.len() == self.dimensions,
            "provider returned {} dimensions, expected {}",
            vector.len(),
            self.dimensions
        );

        Ok(Embedding {
            vector,
            model: body.model.unwrap_or_else(|| self.model.clone()),
            dimensions: self.dimensions,
            token_estimate: estimate_tokens(text),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.model
    }
}
