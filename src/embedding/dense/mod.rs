//! Sentence-embedding encoder (BERT family, mean pooling).
//!
//! `encode`/`fit` return raw model vectors. Normalization is a separate, explicit step
//! ([`DenseEncoder::normalize`]) so callers decide whether to score raw or unit vectors.
//! Use [`DenseConfig::stub`] for tests/examples without model files.

/// Dense encoder configuration.
pub mod config;
pub(crate) mod model;

#[cfg(test)]
mod tests;

pub use config::DenseConfig;

use candle_core::{Device, Tensor};
use tracing::{debug, info, warn};

use crate::embedding::device::select_device;
use crate::embedding::encoder::Encoder;
use crate::embedding::error::EmbeddingError;
use crate::embedding::kind::RepresentationKind;
use crate::embedding::utils::{ModelFiles, load_tokenizer};
use crate::error::EngineResult;
use crate::store::{DocId, Document, Embedding, VectorStore};

use model::BertEmbedder;

enum DenseBackend {
    Model {
        model: BertEmbedder,
        tokenizer: tokenizers::Tokenizer,
        device: Device,
    },
    Stub,
}

/// Wraps a pretrained embedding model. Weights and device live as long as the encoder.
pub struct DenseEncoder {
    backend: DenseBackend,
    config: DenseConfig,
    embedding_dim: usize,
}

impl std::fmt::Debug for DenseEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseEncoder")
            .field(
                "backend",
                &match &self.backend {
                    DenseBackend::Model { device, .. } => format!("Model({:?})", device),
                    DenseBackend::Stub => "Stub".to_string(),
                },
            )
            .field("model_identifier", &self.config.model_identifier)
            .field("embedding_dim", &self.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl DenseEncoder {
    /// Loads the encoder from a config (stub mode is supported).
    pub fn load(config: DenseConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Dense encoder running in STUB mode (testing only)");
            return Ok(Self {
                embedding_dim: config.embedding_dim,
                backend: DenseBackend::Stub,
                config,
            });
        }

        let model_dir = config
            .model_dir()
            .ok_or_else(|| EmbeddingError::ModelNotFound {
                path: config.model_identifier.clone().into(),
            })?;
        let files = ModelFiles::locate(&model_dir)?;

        let device = select_device(config.device);
        debug!(?device, "Selected compute device for dense encoder");

        let tokenizer = load_tokenizer(&files.tokenizer)?;
        let model = BertEmbedder::load(&files, &device)?;
        let embedding_dim = model.hidden_size();

        info!(
            model_identifier = %config.model_identifier,
            model_dir = %model_dir.display(),
            embedding_dim,
            max_seq_len = config.max_seq_len,
            "Dense encoder model loaded"
        );

        Ok(Self {
            backend: DenseBackend::Model {
                model,
                tokenizer,
                device,
            },
            config,
            embedding_dim,
        })
    }

    /// Raw (unnormalized) embedding of one text.
    pub fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            DenseBackend::Model {
                model,
                tokenizer,
                device,
            } => self.encode_with_model(text, model, tokenizer, device),
            DenseBackend::Stub => Ok(self.encode_stub(text)),
        }
    }

    /// Raw embeddings for a batch of texts, in order.
    pub fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// Rows scaled to unit L2 norm. All-zero rows stay zero.
    pub fn normalize(&self, mut embeddings: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
        for row in &mut embeddings {
            normalize_l2(row);
        }
        embeddings
    }

    /// Token count of each text before truncation (special tokens included).
    pub fn token_lengths(&self, texts: &[&str]) -> Result<Vec<usize>, EmbeddingError> {
        texts
            .iter()
            .map(|text| match &self.backend {
                DenseBackend::Model { tokenizer, .. } => tokenizer
                    .encode(*text, true)
                    .map(|encoding| encoding.len())
                    .map_err(|e| EmbeddingError::TokenizationFailed {
                        reason: e.to_string(),
                    }),
                DenseBackend::Stub => Ok(text.split_whitespace().count()),
            })
            .collect()
    }

    /// Encodes a corpus and L2-normalizes every row.
    pub fn fit_normalized(&self, corpus: &[Document]) -> EngineResult<VectorStore> {
        let (ids, vectors) = self.encode_corpus(corpus)?;
        VectorStore::dense_with_dim(self.normalize(vectors), ids, self.embedding_dim)
    }

    fn encode_corpus(
        &self,
        corpus: &[Document],
    ) -> Result<(Vec<DocId>, Vec<Vec<f32>>), EmbeddingError> {
        let texts: Vec<&str> = corpus.iter().map(|doc| doc.text.as_str()).collect();
        let vectors = self.encode_batch(&texts)?;
        let ids = corpus.iter().map(|doc| doc.id.clone()).collect();

        debug!(
            documents = corpus.len(),
            embedding_dim = self.embedding_dim,
            "Encoded dense corpus"
        );

        Ok((ids, vectors))
    }

    fn encode_with_model(
        &self,
        text: &str,
        model: &BertEmbedder,
        tokenizer: &tokenizers::Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let mut tokens: Vec<u32> = encoding.get_ids().to_vec();
        if tokens.is_empty() {
            return Ok(vec![0.0; self.embedding_dim]);
        }

        let max = self.config.max_seq_len;
        if tokens.len() > max {
            debug!(
                token_count = tokens.len(),
                max_seq_len = max,
                "Truncating dense input"
            );
            // Keep the closing special token ([SEP]) in place when there is room for it.
            let ends_with_special = encoding
                .get_special_tokens_mask()
                .last()
                .is_some_and(|&m| m == 1);
            let last = tokens[tokens.len() - 1];
            if ends_with_special && max >= 2 {
                tokens.truncate(max - 1);
                tokens.push(last);
            } else {
                tokens.truncate(max);
            }
        }

        let input_ids = Tensor::new(&tokens[..], device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("failed to create input tensor: {}", e),
            })?;

        model
            .embed(&input_ids)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("transformer forward pass failed: {}", e),
            })
    }

    /// Deterministic pseudo-embedding seeded from the truncated token sequence.
    fn encode_stub(&self, text: &str) -> Vec<f32> {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .take(self.config.max_seq_len)
            .collect();
        if tokens.is_empty() {
            return vec![0.0; self.embedding_dim];
        }

        let digest = blake3::hash(tokens.join(" ").as_bytes());
        let mut state = u64::from_le_bytes(
            digest.as_bytes()[0..8]
                .try_into()
                .unwrap_or([0u8; 8]),
        );

        (0..self.embedding_dim)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect()
    }

    /// Output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Token limit applied before encoding.
    pub fn max_seq_len(&self) -> usize {
        self.config.max_seq_len
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, DenseBackend::Stub)
    }

    pub fn config(&self) -> &DenseConfig {
        &self.config
    }
}

impl Encoder for DenseEncoder {
    fn kind(&self) -> RepresentationKind {
        RepresentationKind::Dense
    }

    fn fit(&mut self, corpus: &[Document]) -> EngineResult<VectorStore> {
        let (ids, vectors) = self.encode_corpus(corpus)?;
        VectorStore::dense_with_dim(vectors, ids, self.embedding_dim)
    }

    fn encode_query(&self, text: &str) -> EngineResult<Embedding> {
        Ok(Embedding::Dense(self.encode(text)?))
    }
}

/// Scales `values` to unit L2 norm in place; zero vectors are left untouched.
pub fn normalize_l2(values: &mut [f32]) {
    let norm = values.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in values.iter_mut() {
            *x /= norm;
        }
    }
}
