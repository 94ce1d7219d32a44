//! Rank fusion: combining lexical and semantic result lists.
//!
//! Two algorithms are available, selected by [`FusionMethod`]:
//!
//! - **Weighted fusion** — min-max normalize each list independently,
//!   merge by document id, and blend with
//!   `hybrid = alpha·lexical + (1-alpha)·semantic`. A document present in
//!   only one list gets `0` for the missing signal. When a document
//!   appears in both lists, its display fields (excerpt, title) always
//!   come from the semantic record — a fixed tie-break that keeps the
//!   merge deterministic regardless of processing order.
//! - **Reciprocal rank fusion** — accumulate `1/(k+rank)` per document
//!   across all rankings. Documents at better ranks, or present in more
//!   rankings, score higher. Source ranks are retained per document.
//!
//! Both sorts are stable: equal scores keep first-seen order.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::EngineError;
use crate::models::{RankedResult, ScoreBreakdown, SemanticHit};

/// RRF smoothing constant from the literature.
pub const RRF_K: usize = 60;

/// Fusion algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionMethod {
    Weighted,
    Rrf,
}

impl Default for FusionMethod {
    fn default() -> Self {
        FusionMethod::Weighted
    }
}

impl FromStr for FusionMethod {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighted" => Ok(FusionMethod::Weighted),
            "rrf" => Ok(FusionMethod::Rrf),
            other => Err(EngineError::UnknownFusionMethod(other.to_string())),
        }
    }
}

/// Min-max normalize raw scores to `[0.0, 1.0]`.
///
/// A list with a single element or zero score-range normalizes to `0.0`
/// for every element.
pub fn min_max_normalize(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let min = scores.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = scores.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let range = max - min;
    if range == 0.0 {
        return vec![0.0; scores.len()];
    }
    scores.iter().map(|s| (s - min) / range).collect()
}

/// Validate that `alpha` lies in `[0.0, 1.0]`. Never clamps.
pub fn validate_alpha(alpha: f64) -> Result<(), EngineError> {
    if !(0.0..=1.0).contains(&alpha) || alpha.is_nan() {
        return Err(EngineError::InvalidAlpha(alpha));
    }
    Ok(())
}

struct FusedEntry {
    record: RankedResult,
    keyword: f64,
    semantic: f64,
}

/// Weighted-score fusion of lexical results and semantic hits.
///
/// `alpha = 1.0` ranks purely by the lexical signal, `alpha = 0.0` purely
/// by the semantic signal. Fails fast on alpha outside `[0, 1]`.
pub fn weighted_fusion(
    lexical: &[RankedResult],
    semantic: &[SemanticHit],
    alpha: f64,
) -> Result<Vec<RankedResult>, EngineError> {
    validate_alpha(alpha)?;

    let lex_norm = min_max_normalize(&lexical.iter().map(|r| r.score).collect::<Vec<_>>());
    let sem_norm = min_max_normalize(&semantic.iter().map(|h| h.similarity).collect::<Vec<_>>());

    // Insertion-ordered merge: lexical results first, then semantic-only
    // documents in semantic order. Repeated semantic hits for one document
    // collapse into a single entry, later hit winning. The stable sort
    // below preserves insertion order for equal scores.
    let mut entries: Vec<FusedEntry> = Vec::with_capacity(lexical.len() + semantic.len());
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (result, &norm) in lexical.iter().zip(lex_norm.iter()) {
        index.insert(result.document_id.as_str(), entries.len());
        entries.push(FusedEntry {
            record: result.clone(),
            keyword: norm,
            semantic: 0.0,
        });
    }

    for (hit, &norm) in semantic.iter().zip(sem_norm.iter()) {
        match index.get(hit.document_id.as_str()) {
            Some(&i) => {
                let entry = &mut entries[i];
                entry.semantic = norm;
                // Display fields always come from the semantic record.
                entry.record.excerpt = hit.excerpt.clone();
                if let Some(title) = hit.title() {
                    entry.record.title = Some(title);
                }
            }
            None => {
                index.insert(hit.document_id.as_str(), entries.len());
                entries.push(FusedEntry {
                    record: RankedResult::from_semantic(hit),
                    keyword: 0.0,
                    semantic: norm,
                });
            }
        }
    }

    let mut results: Vec<RankedResult> = entries
        .into_iter()
        .map(|entry| {
            let hybrid = alpha * entry.keyword + (1.0 - alpha) * entry.semantic;
            let mut record = entry.record;
            record.score = hybrid;
            record.breakdown = ScoreBreakdown::Fused {
                keyword_score: entry.keyword,
                semantic_score: entry.semantic,
                hybrid_score: hybrid,
            };
            record
        })
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Ok(results)
}

struct RrfEntry {
    record: RankedResult,
    score: f64,
    ranks: Vec<usize>,
}

/// Reciprocal rank fusion over any number of rankings.
///
/// Each document accumulates `1/(k + rank)` for its 1-based position in
/// every ranking it appears in. The carried record is the one from the
/// first ranking the document was seen in.
pub fn reciprocal_rank_fusion(rankings: &[Vec<RankedResult>], k: usize) -> Vec<RankedResult> {
    let mut entries: Vec<RrfEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for ranking in rankings {
        for (pos, result) in ranking.iter().enumerate() {
            let rank = pos + 1;
            let contribution = 1.0 / (k + rank) as f64;
            match index.get(result.document_id.as_str()) {
                Some(&i) => {
                    entries[i].score += contribution;
                    entries[i].ranks.push(rank);
                }
                None => {
                    index.insert(result.document_id.clone(), entries.len());
                    entries.push(RrfEntry {
                        record: result.clone(),
                        score: contribution,
                        ranks: vec![rank],
                    });
                }
            }
        }
    }

    let mut results: Vec<RankedResult> = entries
        .into_iter()
        .map(|entry| {
            let mut record = entry.record;
            record.score = entry.score;
            record.breakdown = ScoreBreakdown::Rrf {
                rrf_score: entry.score,
                source_ranks: entry.ranks,
            };
            record
        })
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn lex(id: &str, score: f64) -> RankedResult {
        RankedResult {
            document_id: id.to_string(),
            title: Some(format!("doc {id}")),
            doc_type: None,
            score,
            breakdown: ScoreBreakdown::Fused {
                keyword_score: score,
                semantic_score: 0.0,
                hybrid_score: score,
            },
            excerpt: None,
            tags: BTreeSet::new(),
            external_refs: BTreeSet::new(),
        }
    }

    fn sem(id: &str, similarity: f64, excerpt: &str) -> SemanticHit {
        SemanticHit {
            document_id: id.to_string(),
            similarity,
            excerpt: Some(excerpt.to_string()),
            metadata: None,
        }
    }

    #[test]
    fn normalize_empty_and_single() {
        assert!(min_max_normalize(&[]).is_empty());
        assert_eq!(min_max_normalize(&[5.0]), vec![0.0]);
    }

    #[test]
    fn normalize_zero_range_is_zero() {
        assert_eq!(min_max_normalize(&[3.0, 3.0, 3.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn normalize_spreads_to_unit_interval() {
        let norm = min_max_normalize(&[0.0, 5.0, 10.0]);
        assert_eq!(norm, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn fusion_method_parses() {
        assert_eq!("weighted".parse::<FusionMethod>().unwrap(), FusionMethod::Weighted);
        assert_eq!("rrf".parse::<FusionMethod>().unwrap(), FusionMethod::Rrf);
        assert!(matches!(
            "linear".parse::<FusionMethod>(),
            Err(EngineError::UnknownFusionMethod(_))
        ));
    }

    #[test]
    fn weighted_rejects_bad_alpha() {
        assert!(matches!(
            weighted_fusion(&[], &[], 1.5),
            Err(EngineError::InvalidAlpha(_))
        ));
        assert!(matches!(
            weighted_fusion(&[], &[], -0.1),
            Err(EngineError::InvalidAlpha(_))
        ));
    }

    #[test]
    fn weighted_scores_stay_in_unit_interval() {
        let lexical = vec![lex("a", 0.9), lex("b", 0.4), lex("c", 0.1)];
        let semantic = vec![sem("b", 0.8, "x"), sem("d", 0.6, "y"), sem("a", 0.2, "z")];
        for alpha in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let fused = weighted_fusion(&lexical, &semantic, alpha).unwrap();
            for r in &fused {
                assert!((0.0..=1.0).contains(&r.score), "score {} out of range", r.score);
            }
        }
    }

    #[test]
    fn weighted_missing_signal_scores_zero() {
        let lexical = vec![lex("a", 0.9), lex("b", 0.1)];
        let semantic = vec![sem("c", 0.8, "x"), sem("d", 0.2, "y")];
        let fused = weighted_fusion(&lexical, &semantic, 0.5).unwrap();
        let a = fused.iter().find(|r| r.document_id == "a").unwrap();
        match &a.breakdown {
            ScoreBreakdown::Fused { semantic_score, .. } => assert_eq!(*semantic_score, 0.0),
            _ => panic!("expected fused breakdown"),
        }
        let c = fused.iter().find(|r| r.document_id == "c").unwrap();
        match &c.breakdown {
            ScoreBreakdown::Fused { keyword_score, .. } => assert_eq!(*keyword_score, 0.0),
            _ => panic!("expected fused breakdown"),
        }
    }

    #[test]
    fn weighted_display_fields_come_from_semantic() {
        let lexical = vec![lex("a", 0.9), lex("b", 0.1)];
        let semantic = vec![sem("a", 0.7, "matched passage")];
        let fused = weighted_fusion(&lexical, &semantic, 0.5).unwrap();
        let a = fused.iter().find(|r| r.document_id == "a").unwrap();
        assert_eq!(a.excerpt.as_deref(), Some("matched passage"));
    }

    #[test]
    fn weighted_merges_duplicate_semantic_hits() {
        // Chunk-level vector stores can return several hits for one
        // document; they must collapse to a single fused record, with the
        // later hit supplying the signal and display fields.
        let semantic = vec![
            sem("dup", 0.9, "first chunk"),
            sem("dup", 0.4, "second chunk"),
            sem("other", 0.2, "x"),
        ];
        let fused = weighted_fusion(&[], &semantic, 0.5).unwrap();
        assert_eq!(fused.iter().filter(|r| r.document_id == "dup").count(), 1);
        assert_eq!(fused.len(), 2);

        let dup = fused.iter().find(|r| r.document_id == "dup").unwrap();
        assert_eq!(dup.excerpt.as_deref(), Some("second chunk"));
        match &dup.breakdown {
            ScoreBreakdown::Fused { semantic_score, .. } => {
                // Normalized over [0.2, 0.9]: the later 0.4 hit wins.
                let expected = (0.4 - 0.2) / 0.7;
                assert!((*semantic_score - expected).abs() < 1e-12);
            }
            _ => panic!("expected fused breakdown"),
        }
    }

    #[test]
    fn weighted_sorts_descending() {
        let lexical = vec![lex("low", 0.1), lex("high", 0.9), lex("mid", 0.5)];
        let fused = weighted_fusion(&lexical, &[], 1.0).unwrap();
        for pair in fused.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(fused[0].document_id, "high");
    }

    #[test]
    fn rrf_symmetric_ranks_tie() {
        // [[A, B], [B, A]] gives both documents 1/(k+1) + 1/(k+2).
        let rankings = vec![
            vec![lex("a", 0.9), lex("b", 0.5)],
            vec![lex("b", 0.8), lex("a", 0.3)],
        ];
        let fused = reciprocal_rank_fusion(&rankings, RRF_K);
        assert_eq!(fused.len(), 2);
        assert!((fused[0].score - fused[1].score).abs() < 1e-12);
        // First-seen document wins the tie.
        assert_eq!(fused[0].document_id, "a");
    }

    #[test]
    fn rrf_first_everywhere_beats_first_once() {
        let rankings = vec![
            vec![lex("both", 0.9), lex("once", 0.5)],
            vec![lex("both", 0.8)],
        ];
        let fused = reciprocal_rank_fusion(&rankings, RRF_K);
        let both = fused.iter().find(|r| r.document_id == "both").unwrap();
        let once = fused.iter().find(|r| r.document_id == "once").unwrap();
        assert!(both.score > once.score);
    }

    #[test]
    fn rrf_retains_source_ranks() {
        let rankings = vec![
            vec![lex("a", 0.9), lex("b", 0.5)],
            vec![lex("b", 0.8), lex("a", 0.3)],
        ];
        let fused = reciprocal_rank_fusion(&rankings, RRF_K);
        let a = fused.iter().find(|r| r.document_id == "a").unwrap();
        match &a.breakdown {
            ScoreBreakdown::Rrf { source_ranks, rrf_score } => {
                assert_eq!(source_ranks, &vec![1, 2]);
                let expected = 1.0 / 61.0 + 1.0 / 62.0;
                assert!((*rrf_score - expected).abs() < 1e-12);
            }
            _ => panic!("expected rrf breakdown"),
        }
    }

    #[test]
    fn rrf_empty_rankings_yield_empty() {
        assert!(reciprocal_rank_fusion(&[], RRF_K).is_empty());
        assert!(reciprocal_rank_fusion(&[Vec::new(), Vec::new()], RRF_K).is_empty());
    }
}
