use tracing::info;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::store::{Document, Embedding, VectorStore};

use super::dense::{DenseConfig, DenseEncoder};
use super::kind::RepresentationKind;
use super::sparse::{SparseConfig, SparseEncoder};

/// Capability shared by every vector producer.
pub trait Encoder {
    /// Representation of the vectors this encoder emits.
    fn kind(&self) -> RepresentationKind;

    /// Encodes a corpus into a new store (one row per document, in order).
    fn fit(&mut self, corpus: &[Document]) -> EngineResult<VectorStore>;

    /// Encodes a query into the same space as the last fitted store.
    fn encode_query(&self, text: &str) -> EngineResult<Embedding>;
}

/// Encoder chosen once from a [`RepresentationKind`].
#[derive(Debug)]
pub enum AnyEncoder {
    /// TF-IDF encoder.
    Sparse(SparseEncoder),
    /// Sentence-embedding encoder.
    Dense(DenseEncoder),
}

impl AnyEncoder {
    /// Builds the encoder variant named by `config.representation`.
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let encoder = match config.representation {
            RepresentationKind::Sparse => Self::sparse(SparseConfig::from(config)),
            RepresentationKind::Dense => Self::dense(DenseConfig::from(config))?,
        };

        info!(kind = %encoder.kind(), "Encoder constructed");
        Ok(encoder)
    }

    /// Sparse variant.
    pub fn sparse(config: SparseConfig) -> Self {
        AnyEncoder::Sparse(SparseEncoder::new(config))
    }

    /// Dense variant (loads the model, or the stub backend).
    pub fn dense(config: DenseConfig) -> EngineResult<Self> {
        Ok(AnyEncoder::Dense(DenseEncoder::load(config)?))
    }
}

impl Encoder for AnyEncoder {
    fn kind(&self) -> RepresentationKind {
        match self {
            AnyEncoder::Sparse(e) => e.kind(),
            AnyEncoder::Dense(e) => e.kind(),
        }
    }

    fn fit(&mut self, corpus: &[Document]) -> EngineResult<VectorStore> {
        match self {
            AnyEncoder::Sparse(e) => e.fit(corpus),
            AnyEncoder::Dense(e) => e.fit(corpus),
        }
    }

    fn encode_query(&self, text: &str) -> EngineResult<Embedding> {
        match self {
            AnyEncoder::Sparse(e) => e.encode_query(text),
            AnyEncoder::Dense(e) => e.encode_query(text),
        }
    }
}
