use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::SCORE_EPSILON;
use crate::error::EngineError;
use crate::store::DocId;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Row-major score matrix with identifiers on both axes.
pub struct SimilarityMatrix {
    row_ids: Vec<DocId>,
    col_ids: Vec<DocId>,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    pub(crate) fn new(row_ids: Vec<DocId>, col_ids: Vec<DocId>, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), row_ids.len() * col_ids.len());
        Self {
            row_ids,
            col_ids,
            values,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.row_ids.len()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.col_ids.len()
    }

    /// Returns `true` for a `0 × n` or `n × 0` matrix.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Score at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        Some(self.values[row * self.cols() + col])
    }

    /// All scores of one row.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows() {
            return None;
        }
        let cols = self.cols();
        Some(&self.values[row * cols..(row + 1) * cols])
    }

    /// Score between two identifiers.
    pub fn by_id(&self, row_id: &str, col_id: &str) -> Option<f32> {
        let row = self.row_ids.iter().position(|id| id.as_str() == row_id)?;
        let col = self.col_ids.iter().position(|id| id.as_str() == col_id)?;
        self.get(row, col)
    }

    pub fn row_ids(&self) -> &[DocId] {
        &self.row_ids
    }

    pub fn col_ids(&self) -> &[DocId] {
        &self.col_ids
    }

    /// Returns `true` for a square matrix whose mirrored entries agree within
    /// [`SCORE_EPSILON`].
    pub fn is_symmetric(&self) -> bool {
        let n = self.rows();
        if n != self.cols() {
            return false;
        }
        (0..n).all(|i| {
            ((i + 1)..n).all(|j| {
                (self.values[i * n + j] - self.values[j * n + i]).abs() <= SCORE_EPSILON
            })
        })
    }

    /// Flat row-major scores.
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
/// Scores of one query against every row, in store row order.
///
/// The position of an entry is the row index used to break ranking ties.
pub struct QueryScores {
    entries: Vec<(DocId, f32)>,
}

impl QueryScores {
    /// Wraps `(id, score)` pairs; their order becomes the tie-break order.
    pub fn new(entries: Vec<(DocId, f32)>) -> Self {
        Self { entries }
    }

    /// Score for `id`.
    pub fn get(&self, id: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id.as_str() == id)
            .map(|(_, score)| *score)
    }

    /// Entry at row `index`.
    pub fn at(&self, index: usize) -> Option<(&DocId, f32)> {
        self.entries.get(index).map(|(id, score)| (id, *score))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(id, score)` in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&DocId, f32)> + '_ {
        self.entries.iter().map(|(id, score)| (id, *score))
    }

    /// Scores alone, in row order.
    pub fn scores(&self) -> Vec<f32> {
        self.entries.iter().map(|(_, score)| *score).collect()
    }
}

impl<I: Into<DocId>> FromIterator<(I, f32)> for QueryScores {
    fn from_iter<T: IntoIterator<Item = (I, f32)>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(|(id, score)| (id.into(), score)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One ranked candidate.
pub struct RankedHit {
    pub id: DocId,
    pub score: f32,
    /// 1-based position in the result.
    pub rank: usize,
    /// Row index in the scored store.
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
/// Hits ordered by score descending, ties by row index ascending.
pub struct RankedResult {
    hits: Vec<RankedHit>,
}

impl RankedResult {
    pub(crate) fn new(hits: Vec<RankedHit>) -> Self {
        Self { hits }
    }

    pub fn hits(&self) -> &[RankedHit] {
        &self.hits
    }

    /// Identifiers in rank order.
    pub fn ids(&self) -> Vec<&DocId> {
        self.hits.iter().map(|hit| &hit.id).collect()
    }

    /// Best hit, if any.
    pub fn top(&self) -> Option<&RankedHit> {
        self.hits.first()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedHit> {
        self.hits.iter()
    }
}

impl IntoIterator for RankedResult {
    type Item = RankedHit;
    type IntoIter = std::vec::IntoIter<RankedHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

impl<'a> IntoIterator for &'a RankedResult {
    type Item = &'a RankedHit;
    type IntoIter = std::slice::Iter<'a, RankedHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Weight of one known term in a row.
pub struct TermScore {
    /// Vocabulary dimension of the term.
    pub dimension: usize,
    /// Row value at that dimension (0.0 if the row does not contain the term).
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Per-term lookup result for one row.
pub struct Attribution {
    pub row: DocId,
    /// Known terms, keyed by term.
    pub scores: BTreeMap<String, TermScore>,
    /// Requested terms missing from the vocabulary, in request order.
    pub unknown: Vec<String>,
}

impl Attribution {
    /// Score of a known term.
    pub fn get(&self, term: &str) -> Option<f32> {
        self.scores.get(term).map(|s| s.score)
    }

    /// Returns `true` if every requested term was known.
    pub fn is_complete(&self) -> bool {
        self.unknown.is_empty()
    }

    /// One [`EngineError::UnknownTerm`] per unknown term.
    pub fn errors(&self) -> Vec<EngineError> {
        self.unknown
            .iter()
            .map(|term| EngineError::UnknownTerm { term: term.clone() })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Share of a query/row cosine score contributed by one dimension.
pub struct TermContribution {
    pub term: String,
    pub dimension: usize,
    pub query_weight: f32,
    pub row_weight: f32,
    /// `query_weight * row_weight / (|query| * |row|)`.
    pub contribution: f32,
}
