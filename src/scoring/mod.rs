//! Exact scoring over a [`VectorStore`](crate::store::VectorStore).
//!
//! - [`SimilarityEngine`]: cosine similarity (pairwise, cross-store, per query, batched).
//! - [`top_k`] / [`Ranker`]: deterministic ranking of [`QueryScores`].
//! - [`Attributor`]: per-term weights and score breakdowns for sparse stores.
//!
//! Zero-norm vectors score 0.0 against everything, themselves included.

pub mod attribution;
pub mod ranker;
pub mod similarity;
pub mod types;


pub use attribution::Attributor;
pub use ranker::{Ranker, top_k};
pub use similarity::{SimilarityEngine, cosine};
pub use types::{
    Attribution, QueryScores, RankedHit, RankedResult, SimilarityMatrix, TermContribution,
    TermScore,
};
