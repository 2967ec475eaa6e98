//! Row vector representations.

use serde::{Deserialize, Serialize};

use crate::embedding::RepresentationKind;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSparseVector")]
/// Sparse vector in coordinate form: strictly increasing `indices` paired with `values`.
pub struct SparseVector {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

/// Unchecked wire form of [`SparseVector`].
#[derive(Deserialize)]
struct RawSparseVector {
    dim: usize,
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl TryFrom<RawSparseVector> for SparseVector {
    type Error = EngineError;

    fn try_from(raw: RawSparseVector) -> EngineResult<Self> {
        SparseVector::new(raw.dim, raw.indices, raw.values)
    }
}

impl SparseVector {
    /// Creates a sparse vector, validating index order and bounds.
    pub fn new(dim: usize, indices: Vec<u32>, values: Vec<f32>) -> EngineResult<Self> {
        if indices.len() != values.len() {
            return Err(EngineError::dimension_mismatch(format!(
                "sparse vector has {} indices but {} values",
                indices.len(),
                values.len()
            )));
        }

        if let Some(pair) = indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(EngineError::invalid_argument(format!(
                "sparse indices must be strictly increasing, found {} before {}",
                pair[0], pair[1]
            )));
        }

        if let Some(&last) = indices.last()
            && last as usize >= dim
        {
            return Err(EngineError::dimension_mismatch(format!(
                "sparse index {last} out of bounds for dimension {dim}"
            )));
        }

        Ok(Self {
            dim,
            indices,
            values,
        })
    }

    /// All-zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Keeps the non-zero entries of a dense slice.
    pub fn from_dense(dense: &[f32]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i as u32, *v))
            .unzip();

        Self {
            dim: dense.len(),
            indices,
            values,
        }
    }

    /// Logical dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Stored dimension indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Stored values, aligned with [`indices`](Self::indices).
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Value at `index` (0.0 when not stored).
    pub fn get(&self, index: usize) -> f32 {
        match self.indices.binary_search(&(index as u32)) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Number of stored entries that are non-zero.
    pub fn nnz(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// Iterates `(index, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices
            .iter()
            .zip(self.values.iter())
            .map(|(&i, &v)| (i as usize, v))
    }

    /// Expands to a dense vector.
    pub fn to_dense(&self) -> Vec<f32> {
        let mut out = vec![0.0; self.dim];
        for (i, v) in self.iter() {
            out[i] = v;
        }
        out
    }

    /// Dot product with another sparse vector (merge join over sorted indices).
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut a, mut b) = (0, 0);
        let mut sum = 0.0f32;
        while a < self.indices.len() && b < other.indices.len() {
            match self.indices[a].cmp(&other.indices[b]) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[a] * other.values[b];
                    a += 1;
                    b += 1;
                }
            }
        }
        sum
    }

    /// Dot product with a dense slice of the same dimension.
    pub fn dot_dense(&self, dense: &[f32]) -> f32 {
        self.iter()
            .filter_map(|(i, v)| dense.get(i).map(|d| v * d))
            .sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
/// A single row or query vector.
pub enum Embedding {
    /// Fixed-length dense vector (model output).
    Dense(Vec<f32>),
    /// Sparse vector over a vocabulary.
    Sparse(SparseVector),
}

impl Embedding {
    /// Representation of this vector.
    pub fn kind(&self) -> RepresentationKind {
        match self {
            Embedding::Dense(_) => RepresentationKind::Dense,
            Embedding::Sparse(_) => RepresentationKind::Sparse,
        }
    }

    /// Dimensionality.
    pub fn dim(&self) -> usize {
        match self {
            Embedding::Dense(v) => v.len(),
            Embedding::Sparse(v) => v.dim(),
        }
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        match self {
            Embedding::Dense(v) => v.iter().filter(|x| **x != 0.0).count(),
            Embedding::Sparse(v) => v.nnz(),
        }
    }

    /// Value at dimension `index` (0.0 when out of range).
    pub fn get(&self, index: usize) -> f32 {
        match self {
            Embedding::Dense(v) => v.get(index).copied().unwrap_or(0.0),
            Embedding::Sparse(v) => v.get(index),
        }
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f32 {
        match self {
            Embedding::Dense(v) => v.iter().map(|x| x * x).sum::<f32>().sqrt(),
            Embedding::Sparse(v) => v.norm(),
        }
    }

    /// Dot product; dimensions are assumed equal (checked by callers).
    pub fn dot(&self, other: &Embedding) -> f32 {
        match (self, other) {
            (Embedding::Dense(a), Embedding::Dense(b)) => {
                a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
            }
            (Embedding::Sparse(a), Embedding::Sparse(b)) => a.dot(b),
            (Embedding::Sparse(s), Embedding::Dense(d))
            | (Embedding::Dense(d), Embedding::Sparse(s)) => s.dot_dense(d),
        }
    }

    /// Dense copy of the vector.
    pub fn to_dense(&self) -> Vec<f32> {
        match self {
            Embedding::Dense(v) => v.clone(),
            Embedding::Sparse(v) => v.to_dense(),
        }
    }

    /// Borrows the sparse form, if any.
    pub fn as_sparse(&self) -> Option<&SparseVector> {
        match self {
            Embedding::Sparse(v) => Some(v),
            Embedding::Dense(_) => None,
        }
    }

    /// Borrows the dense form, if any.
    pub fn as_dense(&self) -> Option<&[f32]> {
        match self {
            Embedding::Dense(v) => Some(v),
            Embedding::Sparse(_) => None,
        }
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Embedding::Dense(values)
    }
}

impl From<SparseVector> for Embedding {
    fn from(values: SparseVector) -> Self {
        Embedding::Sparse(values)
    }
}
