use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::fusion::FusionMethod;
use crate::hybrid::HybridParams;
use crate::keyword::{FieldBoosts, SearchParams};
use crate::matcher::{BlendWeights, MatchParams};
use crate::metadata::MetadataWeights;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Hybrid search tuning.
#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub fusion_method: FusionMethod,
    #[serde(default)]
    pub similarity_threshold: f64,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
    #[serde(default)]
    pub min_score: f64,
    #[serde(default)]
    pub boosts: FieldBoosts,
}

fn default_alpha() -> f64 {
    0.5
}
fn default_top_k() -> usize {
    20
}
fn default_fetch_limit() -> usize {
    1000
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            fusion_method: FusionMethod::default(),
            similarity_threshold: 0.0,
            top_k: default_top_k(),
            fetch_limit: default_fetch_limit(),
            min_score: 0.0,
            boosts: FieldBoosts::default(),
        }
    }
}

/// Doc-to-doc matching tuning.
#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_match_min_score")]
    pub min_score: f64,
    #[serde(default)]
    pub blend: BlendWeights,
    #[serde(default)]
    pub metadata_weights: MetadataWeights,
}

fn default_top_n() -> usize {
    5
}
fn default_match_min_score() -> f64 {
    0.1
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            min_score: default_match_min_score(),
            blend: BlendWeights::default(),
            metadata_weights: MetadataWeights::default(),
        }
    }
}

impl Config {
    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            top_k: self.retrieval.top_k,
            min_score: self.retrieval.min_score,
            boosts: self.retrieval.boosts.clone(),
        }
    }

    pub fn hybrid_params(&self) -> HybridParams {
        HybridParams {
            top_k: self.retrieval.top_k,
            alpha: self.retrieval.alpha,
            fusion_method: self.retrieval.fusion_method,
            similarity_threshold: self.retrieval.similarity_threshold,
            fetch_limit: self.retrieval.fetch_limit,
            search: self.search_params(),
        }
    }

    pub fn match_params(&self) -> MatchParams {
        MatchParams {
            top_n: self.matching.top_n,
            min_score: self.matching.min_score,
            blend: self.matching.blend.clone(),
            metadata_weights: self.matching.metadata_weights.clone(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate retrieval
    if !(0.0..=1.0).contains(&config.retrieval.alpha) {
        anyhow::bail!("retrieval.alpha must be in [0.0, 1.0]");
    }

    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    if config.retrieval.fetch_limit < 1 {
        anyhow::bail!("retrieval.fetch_limit must be >= 1");
    }

    if config.retrieval.similarity_threshold < 0.0 {
        anyhow::bail!("retrieval.similarity_threshold must be >= 0.0");
    }

    // Validate matching
    if config.matching.top_n < 1 {
        anyhow::bail!("matching.top_n must be >= 1");
    }

    if config.matching.blend.lexical < 0.0 || config.matching.blend.metadata < 0.0 {
        anyhow::bail!("matching.blend weights must be >= 0.0");
    }

    let mw = &config.matching.metadata_weights;
    if mw.tags < 0.0 || mw.external_refs < 0.0 || mw.project < 0.0 {
        anyhow::bail!("matching.metadata_weights must be >= 0.0");
    }

    Ok(config)
}
