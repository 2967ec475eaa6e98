use rayon::prelude::*;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::store::{Embedding, VectorStore};

use super::types::{QueryScores, SimilarityMatrix};

/// Cosine similarity of two vectors of equal length.
///
/// Returns 0.0 when either vector has zero norm. Mixed sparse/dense inputs are allowed.
pub fn cosine(a: &Embedding, b: &Embedding) -> EngineResult<f32> {
    if a.dim() != b.dim() {
        return Err(EngineError::dimension_mismatch(format!(
            "cannot compare vectors of length {} and {}",
            a.dim(),
            b.dim()
        )));
    }
    Ok(cosine_from_parts(a.dot(b), a.norm(), b.norm()))
}

/// Cosine from a precomputed dot product and norms, clamped to `[-1, 1]`.
pub(crate) fn cosine_from_parts(dot: f32, norm_a: f32, norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

#[derive(Debug, Clone, Copy, Default)]
/// Exact cosine scoring over a [`VectorStore`].
pub struct SimilarityEngine;

impl SimilarityEngine {
    pub fn new() -> Self {
        Self
    }

    /// Symmetric `n × n` matrix. The diagonal is 1.0, or 0.0 for zero rows.
    pub fn pairwise(&self, store: &VectorStore) -> SimilarityMatrix {
        let n = store.len();

        let upper: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| self.score_rows(store, i, store, j))
                    .collect::<Vec<f32>>()
            })
            .collect();

        let mut values = vec![0.0f32; n * n];
        for (i, row) in upper.into_iter().enumerate() {
            values[i * n + i] = if store.norm_at(i) == 0.0 { 0.0 } else { 1.0 };
            for (offset, score) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                values[i * n + j] = score;
                values[j * n + i] = score;
            }
        }

        debug!(rows = n, dim = store.dim(), "Computed pairwise similarity");

        SimilarityMatrix::new(store.ids().to_vec(), store.ids().to_vec(), values)
    }

    /// Rectangular `left.len() × right.len()` matrix.
    pub fn between(
        &self,
        left: &VectorStore,
        right: &VectorStore,
    ) -> EngineResult<SimilarityMatrix> {
        if left.kind() != right.kind() {
            return Err(EngineError::dimension_mismatch(format!(
                "cannot compare {} store with {} store",
                left.kind(),
                right.kind()
            )));
        }
        if left.dim() != right.dim() {
            return Err(EngineError::dimension_mismatch(format!(
                "stores have vector lengths {} and {}",
                left.dim(),
                right.dim()
            )));
        }

        let values: Vec<f32> = (0..left.len())
            .into_par_iter()
            .flat_map_iter(|i| (0..right.len()).map(move |j| self.score_rows(left, i, right, j)))
            .collect();

        debug!(
            rows = left.len(),
            cols = right.len(),
            "Computed cross-store similarity"
        );

        Ok(SimilarityMatrix::new(
            left.ids().to_vec(),
            right.ids().to_vec(),
            values,
        ))
    }

    /// Scores `query` against every row, in row order.
    pub fn query_similarity(
        &self,
        store: &VectorStore,
        query: &Embedding,
    ) -> EngineResult<QueryScores> {
        store.check_query(query)?;

        let query_norm = query.norm();
        let entries = store
            .iter()
            .enumerate()
            .map(|(i, (id, row))| {
                let score = cosine_from_parts(query.dot(row), query_norm, store.norm_at(i));
                (id.clone(), score)
            })
            .collect();

        Ok(QueryScores::new(entries))
    }

    /// Scores several queries in parallel. One result per query, in input order.
    pub fn batch_query_similarity(
        &self,
        store: &VectorStore,
        queries: &[Embedding],
    ) -> Vec<EngineResult<QueryScores>> {
        debug!(
            queries = queries.len(),
            rows = store.len(),
            "Scoring query batch"
        );

        queries
            .par_iter()
            .map(|query| self.query_similarity(store, query))
            .collect()
    }

    fn score_rows(&self, left: &VectorStore, i: usize, right: &VectorStore, j: usize) -> f32 {
        match (left.vector_at(i), right.vector_at(j)) {
            (Some(a), Some(b)) => cosine_from_parts(a.dot(b), left.norm_at(i), right.norm_at(j)),
            _ => 0.0,
        }
    }
}
