//! Engine error taxonomy.

use thiserror::Error;

use crate::embedding::{EmbeddingError, RepresentationKind};
use crate::store::DocId;

/// Errors returned by store construction, scoring, ranking, attribution and encoding.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Vector or query shape is incompatible with the store.
    #[error("dimension mismatch: {reason}")]
    DimensionMismatch {
        /// What did not line up.
        reason: String,
    },

    /// Identifier absent from the store.
    #[error("identifier not found: {id}")]
    NotFound {
        /// The missing identifier.
        id: DocId,
    },

    /// Malformed call parameter (e.g. `k < 1`).
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Error message.
        reason: String,
    },

    /// Term absent from the vocabulary. Reported per term, never aborts a call.
    #[error("term not in vocabulary: {term}")]
    UnknownTerm {
        /// The unknown term.
        term: String,
    },

    /// Query-time encoding before any fit.
    #[error("encoder has not been fitted")]
    NotFitted,

    /// Operation not defined for this representation.
    #[error("{operation} is not supported for {kind} stores")]
    UnsupportedOperation {
        /// Operation name.
        operation: &'static str,
        /// Representation of the store it was called on.
        kind: RepresentationKind,
    },

    /// Dense model load or inference failure.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

impl EngineError {
    pub(crate) fn dimension_mismatch(reason: impl Into<String>) -> Self {
        EngineError::DimensionMismatch {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
