//! Simscore library crate (used by the CLI, benches and integration tests).
//!
//! Exact similarity scoring, top-k ranking and term attribution over a fixed corpus
//! encoded as sparse TF-IDF vectors or dense sentence embeddings.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`VectorStore`], [`Embedding`], [`SparseVector`], [`Vocabulary`] - Immutable corpus vectors
//! - [`DocId`], [`Document`] - Corpus input
//! - [`EngineError`], [`EngineResult`] - Error taxonomy
//!
//! ## Encoding
//! - [`SparseEncoder`], [`SparseConfig`] - TF-IDF fit and projection
//! - [`DenseEncoder`], [`DenseConfig`] - Sentence-embedding model (or stub)
//! - [`Encoder`], [`AnyEncoder`], [`RepresentationKind`] - Encoder selection
//!
//! ## Scoring
//! - [`SimilarityEngine`], [`cosine`] - Pairwise, cross-store and query similarity
//! - [`top_k`], [`Ranker`] - Deterministic ranking
//! - [`Attributor`] - Per-term weights and score contributions
//!
//! ## Orchestration
//! - [`Retriever`], [`SearchHit`] - Index a corpus and search it by text
//! - [`EngineConfig`], [`ConfigError`] - Environment/JSON configuration

pub mod config;
pub mod constants;
pub mod embedding;
pub mod error;
pub mod retrieval;
pub mod scoring;
pub mod store;

pub use config::{ConfigError, EngineConfig};
pub use constants::{
    DEFAULT_DENSE_DIM, DEFAULT_MAX_SEQ_LEN, DEFAULT_MIN_TOKEN_LEN, DEFAULT_MODEL_IDENTIFIER,
    DEFAULT_TOP_K, SCORE_EPSILON,
};
pub use embedding::{
    AnyEncoder, DenseConfig, DenseEncoder, DevicePreference, EmbeddingError, Encoder,
    RepresentationKind, SparseConfig, SparseEncoder, StopWords, normalize_l2,
};
pub use error::{EngineError, EngineResult};
pub use retrieval::{Retriever, SearchHit};
pub use scoring::{
    Attribution, Attributor, QueryScores, RankedHit, RankedResult, Ranker, SimilarityEngine,
    SimilarityMatrix, TermContribution, TermScore, cosine, top_k,
};
pub use store::{DocId, Document, Embedding, SparseVector, VectorStore, Vocabulary};
