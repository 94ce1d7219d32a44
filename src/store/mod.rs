//! Collaborator contracts consumed by the engine.
//!
//! The engine never persists documents or computes embeddings. Both
//! concerns live behind async traits so the surrounding service can plug
//! in its own backends. Timeout, retry, and cancellation policy belong to
//! the implementor, not this engine.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{DocType, Document, SemanticHit};

/// Bulk document source. Read-only: the engine needs no write access.
///
/// Documents are constructed immediately before a call and discarded after
/// it returns; the engine never caches them across invocations.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch up to `limit` documents, optionally restricted to one type.
    async fn fetch_documents(
        &self,
        doc_type: Option<DocType>,
        limit: usize,
    ) -> Result<Vec<Document>>;
}

/// External semantic (embedding) search backend.
///
/// The engine only consumes the ranked hit list; how embeddings are
/// computed or stored is entirely the implementor's business.
#[async_trait]
pub trait SemanticIndex: Send + Sync {
    /// Return the `top_k` most similar passages for a query.
    async fn semantic_search(
        &self,
        query: &str,
        doc_type: Option<DocType>,
        top_k: usize,
        filter: Option<&serde_json::Value>,
    ) -> Result<Vec<SemanticHit>>;
}
