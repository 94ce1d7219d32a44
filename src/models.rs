//! Core data models used throughout the engine.
//!
//! These types represent the documents, semantic hits, and ranked results
//! that flow through the matching and retrieval pipeline. Documents are
//! read-only inputs: the engine never mutates or persists them, and every
//! invocation rebuilds its term statistics from the documents it is given.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Document type namespace. Matching is restricted to same-type pairs:
/// a business analysis never matches a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Business analysis document.
    Ba,
    /// Technical analysis document.
    Ta,
    /// Test case document.
    Tc,
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocType::Ba => write!(f, "ba"),
            DocType::Ta => write!(f, "ta"),
            DocType::Tc => write!(f, "tc"),
        }
    }
}

impl FromStr for DocType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ba" => Ok(DocType::Ba),
            "ta" => Ok(DocType::Ta),
            "tc" => Ok(DocType::Tc),
            other => Err(EngineError::UnknownDocType(other.to_string())),
        }
    }
}

/// A document as fetched from the storage collaborator.
///
/// `body` is an arbitrary nested JSON value; [`crate::text::extract_text`]
/// flattens it into plain text. Tags and external references (issue-tracker
/// keys) feed the metadata scorer, `title` feeds the lexical field boost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique within the document's `doc_type` namespace.
    pub id: String,
    pub doc_type: DocType,
    #[serde(default)]
    pub title: Option<String>,
    /// Recursive document content: string, number, bool, null, list, or map.
    #[serde(default)]
    pub body: serde_json::Value,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// External references, e.g. issue-tracker keys.
    #[serde(default)]
    pub external_refs: BTreeSet<String>,
    #[serde(default)]
    pub project_id: Option<i64>,
}

/// A single hit returned by the semantic-search collaborator.
///
/// The engine never computes embeddings; it only consumes this ranked list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticHit {
    pub document_id: String,
    /// Embedding similarity in `[0.0, 1.0]`.
    pub similarity: f64,
    /// Matched-passage excerpt, when the backend provides one.
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl SemanticHit {
    /// Document title carried in the hit's metadata, if any.
    pub fn title(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("title"))
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
    }
}

/// Per-signal score breakdown attached to every [`RankedResult`].
///
/// All fields lie in `[0.0, 1.0]` except `rrf_score`, which is unbounded
/// but monotonic in rank quality.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreBreakdown {
    /// Doc-to-doc matching: cosine over TF-IDF blended with metadata overlap.
    DocMatch {
        lexical_score: f64,
        metadata_score: f64,
        hybrid_score: f64,
    },
    /// Search fusion of keyword and semantic signals. A lexical-only or
    /// semantic-only result uses this variant with the missing signal at
    /// `0.0` and `hybrid_score` equal to the present signal.
    Fused {
        keyword_score: f64,
        semantic_score: f64,
        hybrid_score: f64,
    },
    /// Reciprocal rank fusion. `source_ranks` records the 1-based position
    /// the document held in each input ranking it appeared in.
    Rrf {
        rrf_score: f64,
        source_ranks: Vec<usize>,
    },
}

/// A scored document reference returned by every public operation.
///
/// Result lists are always sorted by `score` descending; ties are broken
/// by stable input order (first-seen document wins).
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub document_id: String,
    pub title: Option<String>,
    pub doc_type: Option<DocType>,
    /// Primary ranking score. Mirrors the `hybrid_score` or `rrf_score`
    /// inside `breakdown`.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    /// Matched-passage excerpt, present when a semantic hit supplied one.
    pub excerpt: Option<String>,
    pub tags: BTreeSet<String>,
    pub external_refs: BTreeSet<String>,
}

impl RankedResult {
    /// Build a result from a semantic hit alone (no lexical signal).
    pub fn from_semantic(hit: &SemanticHit) -> Self {
        RankedResult {
            document_id: hit.document_id.clone(),
            title: hit.title(),
            doc_type: None,
            score: hit.similarity,
            breakdown: ScoreBreakdown::Fused {
                keyword_score: 0.0,
                semantic_score: hit.similarity,
                hybrid_score: hit.similarity,
            },
            excerpt: hit.excerpt.clone(),
            tags: BTreeSet::new(),
            external_refs: BTreeSet::new(),
        }
    }
}
