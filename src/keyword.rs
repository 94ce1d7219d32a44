//! Free-text lexical search across a document corpus.
//!
//! Each document is scored by cosine similarity between the query's TF-IDF
//! vector and a field-weighted document vector. Field weighting works by
//! repetition inside the composite text (title 3×, tags 2×, body 1×), which
//! boosts those terms inside the standard TF formula without touching it.
//!
//! The IDF table spans `{query} ∪ documents` and is rebuilt per call.

use serde::Deserialize;

use crate::models::{DocType, Document, RankedResult, ScoreBreakdown};
use crate::text::{extract_text, tokenize};
use crate::vector::{cosine_similarity, inverse_document_frequency, term_frequency, tfidf_vector};

/// Repetition counts for the composite document text.
///
/// Defaults: title 3×, tags 2×. Body always contributes once.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldBoosts {
    #[serde(default = "default_title_boost")]
    pub title: usize,
    #[serde(default = "default_tag_boost")]
    pub tags: usize,
}

fn default_title_boost() -> usize {
    3
}
fn default_tag_boost() -> usize {
    2
}

impl Default for FieldBoosts {
    fn default() -> Self {
        Self {
            title: default_title_boost(),
            tags: default_tag_boost(),
        }
    }
}

/// Tuning parameters for [`search_documents`].
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Maximum hits to return.
    pub top_k: usize,
    /// Minimum cosine score kept.
    pub min_score: f64,
    pub boosts: FieldBoosts,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            top_k: 20,
            min_score: 0.0,
            boosts: FieldBoosts::default(),
        }
    }
}

/// Build the field-weighted composite text for one document.
fn composite_text(doc: &Document, boosts: &FieldBoosts) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(title) = &doc.title {
        if !title.is_empty() {
            for _ in 0..boosts.title {
                parts.push(title.clone());
            }
        }
    }

    if !doc.tags.is_empty() {
        let tag_text = doc.tags.iter().cloned().collect::<Vec<_>>().join(" ");
        for _ in 0..boosts.tags {
            parts.push(tag_text.clone());
        }
    }

    parts.push(extract_text(&doc.body));
    parts.join(" ")
}

/// Score every eligible document against a free-text query.
///
/// Documents failing the optional `doc_type` filter are skipped before
/// tokenization, so they do not participate in the IDF corpus. A query
/// with zero tokens after stopword removal returns an empty list, not an
/// error. Results are sorted descending with stable ties and truncated to
/// `top_k`; each hit carries its tags and external refs for downstream
/// explanation.
pub fn search_documents(
    query: &str,
    documents: &[Document],
    doc_type: Option<DocType>,
    params: &SearchParams,
) -> Vec<RankedResult> {
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return Vec::new();
    }

    let eligible: Vec<&Document> = documents
        .iter()
        .filter(|d| doc_type.map_or(true, |dt| d.doc_type == dt))
        .collect();
    if eligible.is_empty() {
        return Vec::new();
    }

    let doc_tokens: Vec<Vec<String>> = eligible
        .iter()
        .map(|d| tokenize(&composite_text(d, &params.boosts)))
        .collect();

    // The query participates in the corpus, so its terms always have a
    // document frequency of at least one.
    let mut all_tokens: Vec<Vec<String>> = Vec::with_capacity(doc_tokens.len() + 1);
    all_tokens.push(query_tokens.clone());
    all_tokens.extend(doc_tokens.iter().cloned());
    let idf = inverse_document_frequency(&all_tokens);

    let query_vec = tfidf_vector(&term_frequency(&query_tokens), &idf);

    let mut results: Vec<RankedResult> = Vec::new();
    for (doc, tokens) in eligible.iter().zip(doc_tokens.iter()) {
        let doc_vec = tfidf_vector(&term_frequency(tokens), &idf);
        let score = cosine_similarity(&query_vec, &doc_vec);
        if score < params.min_score {
            continue;
        }

        results.push(RankedResult {
            document_id: doc.id.clone(),
            title: doc.title.clone(),
            doc_type: Some(doc.doc_type),
            score,
            breakdown: ScoreBreakdown::Fused {
                keyword_score: score,
                semantic_score: 0.0,
                hybrid_score: score,
            },
            excerpt: None,
            tags: doc.tags.clone(),
            external_refs: doc.external_refs.clone(),
        });
    }

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(params.top_k);
    results
}
