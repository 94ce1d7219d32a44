//! Metadata overlap scoring between two documents.
//!
//! Tags, external references, and project ownership each contribute a
//! weighted share of the score. The default weights are empirical tunings
//! carried over from the original product behavior; they are configurable
//! constants, not laws.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::models::Document;

/// Sub-score weights for [`metadata_score`].
///
/// Defaults: tags 0.5, external refs 0.3, shared project 0.2.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataWeights {
    #[serde(default = "default_tags_weight")]
    pub tags: f64,
    #[serde(default = "default_refs_weight")]
    pub external_refs: f64,
    #[serde(default = "default_project_weight")]
    pub project: f64,
}

fn default_tags_weight() -> f64 {
    0.5
}
fn default_refs_weight() -> f64 {
    0.3
}
fn default_project_weight() -> f64 {
    0.2
}

impl Default for MetadataWeights {
    fn default() -> Self {
        Self {
            tags: default_tags_weight(),
            external_refs: default_refs_weight(),
            project: default_project_weight(),
        }
    }
}

/// Jaccard index `|A∩B| / |A∪B|` between two string sets.
///
/// Two empty sets score `0.0`, not undefined.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Metadata similarity between two documents, in `[0.0, 1.0]`.
///
/// `tags·jaccard(tags) + refs·jaccard(external_refs) + project·[same
/// project, both present]`, summed and capped at `1.0`.
pub fn metadata_score(a: &Document, b: &Document, weights: &MetadataWeights) -> f64 {
    let mut score = 0.0;

    score += weights.tags * jaccard(&a.tags, &b.tags);
    score += weights.external_refs * jaccard(&a.external_refs, &b.external_refs);

    if let (Some(p1), Some(p2)) = (a.project_id, b.project_id) {
        if p1 == p2 {
            score += weights.project;
        }
    }

    score.min(1.0)
}
