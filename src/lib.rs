//! Semantic content store for generated content.
//!
//! `corpus` keeps generated content documents in an embedding-indexed,
//! in-process store and answers similarity queries over them. Every stored
//! document carries the original payload, a flattened searchable text, the
//! embedding derived from that text, and mergeable metadata:
//!
//! | Operation | Purpose |
//! |-----------|---------|
//! | **store** | Extract searchable text, embed it, index the document |
//! | **update** | Re-derive text and embedding, merge metadata |
//! | **delete** | Remove the document and its embedding record |
//! | **get** | Direct lookup by content id |
//! | **search** | Cosine-ranked similarity query with threshold and limit |
//! | **analytics** | Aggregate search history over a rolling window |
//!
//! # Architecture
//!
//! - **Storage**: an owned in-memory repository — documents keyed by content
//!   id plus a parallel embedding-record index, always written together
//! - **Embeddings**: pluggable [`embedding::EmbeddingProvider`] — a
//!   deterministic hash-based provider for reproducible behavior, or an
//!   OpenAI-compatible HTTP backend
//! - **Search**: exact cosine similarity over a linear scan with
//!   threshold, content-type filter, and result-limit semantics
//! - **Transport**: thin HTTP adapter (axum) over the function-call API
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`content`] — Core store: repository, extraction, search, history, facade
//! - [`embedding`] — Text-to-vector embedding providers

pub mod config;
pub mod content;
pub mod embedding;
