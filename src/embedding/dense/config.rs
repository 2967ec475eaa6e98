use std::path::PathBuf;

use crate::config::EngineConfig;
use crate::constants::{DEFAULT_DENSE_DIM, DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_IDENTIFIER};
use crate::embedding::device::DevicePreference;
use crate::embedding::error::EmbeddingError;

#[derive(Debug, Clone)]
/// Configuration for [`DenseEncoder`](super::DenseEncoder).
pub struct DenseConfig {
    /// Model name; also tried as a local directory when `model_path` is unset.
    pub model_identifier: String,
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_path: Option<PathBuf>,
    /// Max tokens per input; longer inputs are truncated.
    pub max_seq_len: usize,
    /// Embedding size of the stub backend (the real model dictates its own).
    pub embedding_dim: usize,
    /// Compute device.
    pub device: DevicePreference,
    /// If true, run the deterministic stub backend (no model files required).
    pub testing_stub: bool,
}

impl Default for DenseConfig {
    fn default() -> Self {
        Self {
            model_identifier: DEFAULT_MODEL_IDENTIFIER.to_string(),
            model_path: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            embedding_dim: DEFAULT_DENSE_DIM,
            device: DevicePreference::Cpu,
            testing_stub: false,
        }
    }
}

impl DenseConfig {
    /// Config for a local model directory.
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    /// Stub config (no model files; deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    pub fn with_device(mut self, device: DevicePreference) -> Self {
        self.device = device;
        self
    }

    /// Directory the model is read from: `model_path`, else `model_identifier` if it is a
    /// local directory.
    pub fn model_dir(&self) -> Option<PathBuf> {
        if let Some(path) = &self.model_path {
            return Some(path.clone());
        }
        let candidate = PathBuf::from(&self.model_identifier);
        candidate.is_dir().then_some(candidate)
    }

    /// Validates limits and, outside stub mode, that a model directory is resolvable.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be at least 1".to_string(),
            });
        }

        if self.testing_stub {
            if self.embedding_dim == 0 {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "embedding_dim must be at least 1".to_string(),
                });
            }
            return Ok(());
        }

        match self.model_dir() {
            Some(dir) if dir.is_dir() => Ok(()),
            Some(dir) => Err(EmbeddingError::ModelNotFound { path: dir }),
            None => Err(EmbeddingError::ModelNotFound {
                path: PathBuf::from(&self.model_identifier),
            }),
        }
    }
}

impl From<&EngineConfig> for DenseConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            model_identifier: config.model_identifier.clone(),
            model_path: config.model_path.clone(),
            max_seq_len: config.max_sequence_length,
            device: config.device,
            testing_stub: config.dense_stub,
            ..Default::default()
        }
    }
}
