//! Hybrid search orchestration.
//!
//! Runs the internal lexical search and the external semantic collaborator
//! for one query, then fuses the two ranked lists. Each signal source is
//! independent: a failed source is logged and the other source's results
//! are returned unchanged, with the missing signal implicitly `0`. When
//! both sources fail the result list is empty — callers never see an
//! engine-internal error for degraded signal availability, only for
//! invalid parameters.
//!
//! The outcome carries a per-signal [`SignalStatus`] so callers can
//! distinguish "no matches" from "both backends unavailable".

use serde::Serialize;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::fusion::{
    reciprocal_rank_fusion, validate_alpha, weighted_fusion, FusionMethod, RRF_K,
};
use crate::keyword::{search_documents, SearchParams};
use crate::models::{DocType, RankedResult, SemanticHit};
use crate::store::{DocumentStore, SemanticIndex};

/// Tuning parameters for [`hybrid_search`].
#[derive(Debug, Clone)]
pub struct HybridParams {
    /// Maximum fused results to return.
    pub top_k: usize,
    /// Blend weight favoring lexical (`1.0`) vs semantic (`0.0`).
    pub alpha: f64,
    pub fusion_method: FusionMethod,
    /// Minimum semantic similarity admitted before fusion.
    pub similarity_threshold: f64,
    /// Maximum documents fetched from the store per call.
    pub fetch_limit: usize,
    /// Lexical search tuning (field boosts, min score).
    pub search: SearchParams,
}

impl Default for HybridParams {
    fn default() -> Self {
        Self {
            top_k: 20,
            alpha: 0.5,
            fusion_method: FusionMethod::Weighted,
            similarity_threshold: 0.0,
            fetch_limit: 1000,
            search: SearchParams::default(),
        }
    }
}

/// Outcome of one signal source.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignalStatus {
    /// The source responded; `hits` counts results before fusion.
    Ok { hits: usize },
    /// The source failed; its results were treated as empty.
    Failed { error: String },
}

impl SignalStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, SignalStatus::Ok { .. })
    }
}

/// Fused result list plus per-signal diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct HybridOutcome {
    pub results: Vec<RankedResult>,
    pub lexical: SignalStatus,
    pub semantic: SignalStatus,
}

/// Run a hybrid search against a document store and a semantic index.
///
/// Both collaborators are queried with `top_k × 2` candidates to give the
/// fusion step more material. Returns `Err` only for parameter validation
/// (`alpha` outside `[0, 1]`); collaborator failures degrade per the
/// module policy above.
pub async fn hybrid_search<S, V>(
    store: &S,
    index: &V,
    query: &str,
    doc_type: Option<DocType>,
    params: &HybridParams,
) -> Result<HybridOutcome, EngineError>
where
    S: DocumentStore,
    V: SemanticIndex,
{
    validate_alpha(params.alpha)?;

    let candidate_k = params.top_k * 2;

    let (lexical_results, lexical_status) =
        run_lexical(store, query, doc_type, candidate_k, params).await;
    let (semantic_hits, semantic_status) =
        run_semantic(index, query, doc_type, candidate_k, params.similarity_threshold).await;

    let mut results = match (lexical_results.is_empty(), semantic_hits.is_empty()) {
        (true, true) => {
            if !lexical_status.is_ok() && !semantic_status.is_ok() {
                warn!("both signal sources failed, returning empty results");
            }
            Vec::new()
        }
        // Degrade to the surviving signal, unchanged.
        (false, true) => {
            info!("only lexical results available");
            lexical_results
        }
        (true, false) => {
            info!("only semantic results available");
            semantic_hits.iter().map(RankedResult::from_semantic).collect()
        }
        (false, false) => match params.fusion_method {
            FusionMethod::Weighted => {
                weighted_fusion(&lexical_results, &semantic_hits, params.alpha)?
            }
            FusionMethod::Rrf => {
                let semantic_ranked: Vec<RankedResult> =
                    semantic_hits.iter().map(RankedResult::from_semantic).collect();
                reciprocal_rank_fusion(&[lexical_results, semantic_ranked], RRF_K)
            }
        },
    };

    results.truncate(params.top_k);

    Ok(HybridOutcome {
        results,
        lexical: lexical_status,
        semantic: semantic_status,
    })
}

async fn run_lexical<S: DocumentStore>(
    store: &S,
    query: &str,
    doc_type: Option<DocType>,
    candidate_k: usize,
    params: &HybridParams,
) -> (Vec<RankedResult>, SignalStatus) {
    match store.fetch_documents(doc_type, params.fetch_limit).await {
        Ok(documents) => {
            let search_params = SearchParams {
                top_k: candidate_k,
                ..params.search.clone()
            };
            let results = search_documents(query, &documents, doc_type, &search_params);
            info!(hits = results.len(), "keyword search completed");
            let count = results.len();
            (results, SignalStatus::Ok { hits: count })
        }
        Err(err) => {
            warn!(error = %err, "keyword search failed");
            (Vec::new(), SignalStatus::Failed {
                error: err.to_string(),
            })
        }
    }
}

async fn run_semantic<V: SemanticIndex>(
    index: &V,
    query: &str,
    doc_type: Option<DocType>,
    candidate_k: usize,
    similarity_threshold: f64,
) -> (Vec<SemanticHit>, SignalStatus) {
    match index.semantic_search(query, doc_type, candidate_k, None).await {
        Ok(mut hits) => {
            if similarity_threshold > 0.0 {
                hits.retain(|h| h.similarity >= similarity_threshold);
            }
            info!(hits = hits.len(), "semantic search completed");
            let count = hits.len();
            (hits, SignalStatus::Ok { hits: count })
        }
        Err(err) => {
            warn!(error = %err, "semantic search failed");
            (Vec::new(), SignalStatus::Failed {
                error: err.to_string(),
            })
        }
    }
}
