//! Immutable corpus of row vectors.
//!
//! A [`VectorStore`] is built once per corpus encode and never mutated afterwards, so
//! it can be shared across threads and scored concurrently without locking.

pub mod types;
pub mod vector;
pub mod vocabulary;


pub use types::{DocId, Document};
pub use vector::{Embedding, SparseVector};
pub use vocabulary::Vocabulary;

use std::collections::HashMap;

use tracing::debug;

use crate::embedding::RepresentationKind;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone)]
/// Rows of one representation kind and dimensionality, addressable by [`DocId`].
pub struct VectorStore {
    kind: RepresentationKind,
    dim: usize,
    ids: Vec<DocId>,
    vectors: Vec<Embedding>,
    norms: Vec<f32>,
    positions: HashMap<DocId, usize>,
    vocabulary: Option<Vocabulary>,
}

impl VectorStore {
    /// Builds a store, enforcing shape, kind and identifier invariants.
    ///
    /// With no rows the dimensionality is taken from the vocabulary (or 0).
    pub fn build(
        kind: RepresentationKind,
        vectors: Vec<Embedding>,
        ids: Vec<DocId>,
        vocabulary: Option<Vocabulary>,
    ) -> EngineResult<Self> {
        Self::assemble(kind, vectors, ids, vocabulary, None)
    }

    fn assemble(
        kind: RepresentationKind,
        vectors: Vec<Embedding>,
        ids: Vec<DocId>,
        vocabulary: Option<Vocabulary>,
        declared_dim: Option<usize>,
    ) -> EngineResult<Self> {
        if ids.len() != vectors.len() {
            return Err(EngineError::dimension_mismatch(format!(
                "{} identifiers for {} rows",
                ids.len(),
                vectors.len()
            )));
        }

        if vocabulary.is_some() && kind == RepresentationKind::Dense {
            return Err(EngineError::invalid_argument(
                "a vocabulary can only be attached to a sparse store",
            ));
        }

        let dim = declared_dim
            .or_else(|| vectors.first().map(Embedding::dim))
            .or_else(|| vocabulary.as_ref().map(Vocabulary::len))
            .unwrap_or(0);

        for (row, (id, vector)) in ids.iter().zip(vectors.iter()).enumerate() {
            if vector.kind() != kind {
                return Err(EngineError::dimension_mismatch(format!(
                    "row {row} ({id}) is {} but the store is {kind}",
                    vector.kind()
                )));
            }
            if vector.dim() != dim {
                return Err(EngineError::dimension_mismatch(format!(
                    "row {row} ({id}) has length {} but expected {dim}",
                    vector.dim()
                )));
            }
        }

        if let Some(vocab) = &vocabulary
            && vocab.len() != dim
        {
            return Err(EngineError::dimension_mismatch(format!(
                "vocabulary has {} terms but vectors have length {dim}",
                vocab.len()
            )));
        }

        let mut positions = HashMap::with_capacity(ids.len());
        for (row, id) in ids.iter().enumerate() {
            if positions.insert(id.clone(), row).is_some() {
                return Err(EngineError::dimension_mismatch(format!(
                    "identifier {id} is not unique"
                )));
            }
        }

        let norms = vectors.iter().map(Embedding::norm).collect();

        debug!(
            %kind,
            rows = vectors.len(),
            dim,
            has_vocabulary = vocabulary.is_some(),
            "Built vector store"
        );

        Ok(Self {
            kind,
            dim,
            ids,
            vectors,
            norms,
            positions,
            vocabulary,
        })
    }

    /// Builds a dense store.
    pub fn dense(vectors: Vec<Vec<f32>>, ids: Vec<DocId>) -> EngineResult<Self> {
        let vectors = vectors.into_iter().map(Embedding::Dense).collect();
        Self::build(RepresentationKind::Dense, vectors, ids, None)
    }

    /// Builds a dense store whose rows must all have length `dim`.
    ///
    /// An empty store keeps `dim`, so queries of that length still score.
    pub fn dense_with_dim(
        vectors: Vec<Vec<f32>>,
        ids: Vec<DocId>,
        dim: usize,
    ) -> EngineResult<Self> {
        let vectors = vectors.into_iter().map(Embedding::Dense).collect();
        Self::assemble(RepresentationKind::Dense, vectors, ids, None, Some(dim))
    }

    /// Builds a sparse store with an optional vocabulary.
    pub fn sparse(
        vectors: Vec<SparseVector>,
        ids: Vec<DocId>,
        vocabulary: Option<Vocabulary>,
    ) -> EngineResult<Self> {
        let vectors = vectors.into_iter().map(Embedding::Sparse).collect();
        Self::build(RepresentationKind::Sparse, vectors, ids, vocabulary)
    }

    /// Percentage of non-zero entries across the store; 0.0 when empty.
    pub fn sparsity(&self) -> f64 {
        let total = self.vectors.len() * self.dim;
        if total == 0 {
            return 0.0;
        }
        (self.nnz() as f64 * 100.0) / total as f64
    }

    /// Total non-zero entries.
    pub fn nnz(&self) -> usize {
        self.vectors.iter().map(Embedding::nnz).sum()
    }

    /// Vector for `id`.
    pub fn row(&self, id: &str) -> EngineResult<&Embedding> {
        let pos = self.position(id)?;
        Ok(&self.vectors[pos])
    }

    /// Row index for `id`.
    pub fn position(&self, id: &str) -> EngineResult<usize> {
        self.positions
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::NotFound { id: DocId::from(id) })
    }

    /// Identifier at row `index`.
    pub fn id_at(&self, index: usize) -> Option<&DocId> {
        self.ids.get(index)
    }

    /// Vector at row `index`.
    pub fn vector_at(&self, index: usize) -> Option<&Embedding> {
        self.vectors.get(index)
    }

    /// Cached L2 norm of row `index`.
    pub(crate) fn norm_at(&self, index: usize) -> f32 {
        self.norms[index]
    }

    /// Sorted non-zero vocabulary terms of a sparse row.
    pub fn row_terms(&self, id: &str) -> EngineResult<Vec<&str>> {
        let vocab = self.require_vocabulary("row_terms")?;
        let row = self.row(id)?;

        let mut terms: Vec<&str> = match row {
            Embedding::Sparse(v) => v
                .iter()
                .filter(|(_, value)| *value != 0.0)
                .filter_map(|(i, _)| vocab.term(i))
                .collect(),
            Embedding::Dense(_) => Vec::new(),
        };
        terms.sort_unstable();
        Ok(terms)
    }

    pub(crate) fn require_vocabulary(&self, operation: &'static str) -> EngineResult<&Vocabulary> {
        match (&self.kind, &self.vocabulary) {
            (RepresentationKind::Sparse, Some(vocab)) => Ok(vocab),
            _ => Err(EngineError::UnsupportedOperation {
                operation,
                kind: self.kind,
            }),
        }
    }

    /// Representation kind shared by every row.
    pub fn kind(&self) -> RepresentationKind {
        self.kind
    }

    /// Vector length shared by every row.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns `true` if the store has no rows.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Row identifiers in row order.
    pub fn ids(&self) -> &[DocId] {
        &self.ids
    }

    /// Vocabulary (sparse stores only).
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    /// Iterates `(id, vector)` in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&DocId, &Embedding)> + '_ {
        self.ids.iter().zip(self.vectors.iter())
    }

    /// Checks that `query` can be scored against this store.
    pub(crate) fn check_query(&self, query: &Embedding) -> EngineResult<()> {
        if query.kind() != self.kind {
            return Err(EngineError::dimension_mismatch(format!(
                "{} query against {} store",
                query.kind(),
                self.kind
            )));
        }
        if query.dim() != self.dim {
            return Err(EngineError::dimension_mismatch(format!(
                "query has length {} but store vectors have length {}",
                query.dim(),
                self.dim
            )));
        }
        Ok(())
    }
}
