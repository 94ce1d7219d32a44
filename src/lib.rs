//! # docmatch
//!
//! Hybrid document retrieval and similarity engine: TF-IDF doc-to-doc
//! matching, field-weighted lexical search, and rank fusion with an
//! external semantic backend.
//!
//! All scoring is computed per call over the documents supplied to that
//! call. The engine holds no persistent index; storage and embeddings
//! live behind the [`store`] traits.

pub mod config;
pub mod error;
pub mod fusion;
pub mod hybrid;
pub mod keyword;
pub mod matcher;
pub mod metadata;
pub mod models;
pub mod store;
pub mod text;
pub mod vector;
