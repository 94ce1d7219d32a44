//! In-memory [`DocumentStore`] implementation for tests and
//! embedding-free deployments.
//!
//! Holds documents in a `Vec` behind `std::sync::RwLock` for thread
//! safety. Fetches preserve insertion order, which keeps downstream
//! tie-breaking deterministic.

use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{DocType, Document};

use super::DocumentStore;

/// In-memory document store.
pub struct InMemoryStore {
    docs: RwLock<Vec<Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    /// Seed the store with an initial document set.
    pub fn with_documents(docs: Vec<Document>) -> Self {
        Self {
            docs: RwLock::new(docs),
        }
    }

    /// Append a document.
    pub fn insert(&self, doc: Document) {
        self.docs.write().unwrap().push(doc);
    }

    pub fn len(&self) -> usize {
        self.docs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().unwrap().is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn fetch_documents(
        &self,
        doc_type: Option<DocType>,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let docs = self.docs.read().unwrap();
        Ok(docs
            .iter()
            .filter(|d| doc_type.map_or(true, |dt| d.doc_type == dt))
            .take(limit)
            .cloned()
            .collect())
    }
}
