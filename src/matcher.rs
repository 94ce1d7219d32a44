//! Pairwise "find similar" search.
//!
//! Ranks a candidate set against one target document using a fixed blend
//! of lexical (TF-IDF cosine) and metadata similarity. The IDF table is
//! built over `{target} ∪ candidates` for this call only — no state
//! survives between invocations, so concurrent calls share nothing.
//!
//! # Algorithm
//!
//! 1. Drop candidates of a different `doc_type` and the target itself.
//! 2. Tokenize target and surviving candidates; build one shared IDF table.
//! 3. Score each candidate: `hybrid = 0.6·lexical + 0.4·metadata`.
//! 4. Keep `hybrid >= min_score`, sort descending (stable), take `top_n`.

use serde::Deserialize;

use crate::metadata::{metadata_score, MetadataWeights};
use crate::models::{Document, RankedResult, ScoreBreakdown};
use crate::text::{extract_text, tokenize};
use crate::vector::{cosine_similarity, inverse_document_frequency, term_frequency, tfidf_vector};

/// Blend weights for the doc-to-doc hybrid score.
///
/// Defaults: lexical 0.6, metadata 0.4.
#[derive(Debug, Clone, Deserialize)]
pub struct BlendWeights {
    #[serde(default = "default_lexical_weight")]
    pub lexical: f64,
    #[serde(default = "default_metadata_weight")]
    pub metadata: f64,
}

fn default_lexical_weight() -> f64 {
    0.6
}
fn default_metadata_weight() -> f64 {
    0.4
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            lexical: default_lexical_weight(),
            metadata: default_metadata_weight(),
        }
    }
}

/// Tuning parameters for [`find_similar`].
#[derive(Debug, Clone)]
pub struct MatchParams {
    /// Maximum matches to return.
    pub top_n: usize,
    /// Minimum hybrid score kept.
    pub min_score: f64,
    pub blend: BlendWeights,
    pub metadata_weights: MetadataWeights,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            top_n: 5,
            min_score: 0.1,
            blend: BlendWeights::default(),
            metadata_weights: MetadataWeights::default(),
        }
    }
}

/// Rank `candidates` by similarity to `target`.
///
/// Cross-type candidates and the target itself are never returned. An
/// empty candidate list is success with zero results, not an error.
pub fn find_similar(
    target: &Document,
    candidates: &[Document],
    params: &MatchParams,
) -> Vec<RankedResult> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let eligible: Vec<&Document> = candidates
        .iter()
        .filter(|c| c.doc_type == target.doc_type && c.id != target.id)
        .collect();
    if eligible.is_empty() {
        return Vec::new();
    }

    let target_tokens = tokenize(&extract_text(&target.body));
    let candidate_tokens: Vec<Vec<String>> = eligible
        .iter()
        .map(|c| tokenize(&extract_text(&c.body)))
        .collect();

    // One shared corpus for this call: target plus every eligible candidate.
    let mut all_tokens: Vec<Vec<String>> = Vec::with_capacity(candidate_tokens.len() + 1);
    all_tokens.push(target_tokens.clone());
    all_tokens.extend(candidate_tokens.iter().cloned());
    let idf = inverse_document_frequency(&all_tokens);

    let target_vec = tfidf_vector(&term_frequency(&target_tokens), &idf);

    let mut results: Vec<RankedResult> = Vec::new();
    for (candidate, tokens) in eligible.iter().zip(candidate_tokens.iter()) {
        let candidate_vec = tfidf_vector(&term_frequency(tokens), &idf);
        let lexical = cosine_similarity(&target_vec, &candidate_vec);
        let metadata = metadata_score(target, candidate, &params.metadata_weights);
        let hybrid = params.blend.lexical * lexical + params.blend.metadata * metadata;

        if hybrid < params.min_score {
            continue;
        }

        results.push(RankedResult {
            document_id: candidate.id.clone(),
            title: candidate.title.clone(),
            doc_type: Some(candidate.doc_type),
            score: hybrid,
            breakdown: ScoreBreakdown::DocMatch {
                lexical_score: lexical,
                metadata_score: metadata,
                hybrid_score: hybrid,
            },
            excerpt: None,
            tags: candidate.tags.clone(),
            external_refs: candidate.external_refs.clone(),
        });
    }

    // Stable sort: equal scores keep candidate input order.
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(params.top_n);
    results
}
