//! Errors raised while loading or running the dense encoder.

use std::path::PathBuf;
use thiserror::Error;

/// Model loading, tokenization and inference failures.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// No model files under the resolved directory.
    #[error("embedding model not found at path: {path}")]
    ModelNotFound {
        /// Directory that was searched.
        path: PathBuf,
    },

    /// Weights, config or tokenizer could not be read.
    #[error("failed to load embedding model: {reason}")]
    ModelLoadFailed {
        /// Underlying loader error.
        reason: String,
    },

    /// Forward pass or pooling failed.
    #[error("embedding inference failed: {reason}")]
    InferenceFailed {
        /// Underlying tensor error.
        reason: String,
    },

    /// Text could not be tokenized.
    #[error("tokenization failed: {reason}")]
    TokenizationFailed {
        /// Tokenizer message.
        reason: String,
    },

    /// Rejected [`DenseConfig`](crate::embedding::DenseConfig) value.
    #[error("invalid model configuration: {reason}")]
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
