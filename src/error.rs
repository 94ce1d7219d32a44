//! Error types for the retrieval engine.
//!
//! Only parameter-validation failures surface as errors. Empty inputs are
//! success with zero results, and collaborator failures degrade inside
//! [`crate::hybrid::hybrid_search`] rather than propagating.

use thiserror::Error;

/// Errors returned at the public call boundary.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// `alpha` outside `[0.0, 1.0]`. Never silently clamped.
    #[error("alpha must be within [0.0, 1.0], got {0}")]
    InvalidAlpha(f64),

    /// Fusion method string that is neither `weighted` nor `rrf`.
    #[error("unknown fusion method: '{0}'. Use weighted or rrf.")]
    UnknownFusionMethod(String),

    /// Document type string that is none of `ba`, `ta`, `tc`.
    #[error("unknown document type: '{0}'. Use ba, ta, or tc.")]
    UnknownDocType(String),
}
