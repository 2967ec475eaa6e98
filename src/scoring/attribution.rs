use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::error::EngineResult;
use crate::store::{DocId, Embedding, VectorStore};

use super::types::{Attribution, TermContribution, TermScore};

#[derive(Debug, Clone, Copy, Default)]
/// Explains sparse scores in vocabulary terms.
pub struct Attributor;

impl Attributor {
    pub fn new() -> Self {
        Self
    }

    /// Looks up each term's weight in one row.
    ///
    /// Terms are matched exactly against the vocabulary. Unknown terms are listed in
    /// [`Attribution::unknown`] instead of failing the call; repeated terms count once.
    pub fn attribute<S: AsRef<str>>(
        &self,
        store: &VectorStore,
        row_id: &str,
        terms: &[S],
    ) -> EngineResult<Attribution> {
        let vocab = store.require_vocabulary("attribute")?;
        let row = store.row(row_id)?;

        let mut seen = HashSet::new();
        let mut scores = BTreeMap::new();
        let mut unknown = Vec::new();

        for term in terms.iter().map(AsRef::as_ref) {
            if !seen.insert(term) {
                continue;
            }
            match vocab.index_of(term) {
                Some(dimension) => {
                    let score = row.get(dimension);
                    scores.insert(term.to_string(), TermScore { dimension, score });
                }
                None => unknown.push(term.to_string()),
            }
        }

        debug!(
            row = row_id,
            known = scores.len(),
            unknown = unknown.len(),
            "Attributed terms"
        );

        Ok(Attribution {
            row: DocId::from(row_id),
            scores,
            unknown,
        })
    }

    /// Splits `cosine(query, row)` over the dimensions both vectors share.
    ///
    /// The contributions sum to the cosine score. Sorted by contribution descending,
    /// then dimension ascending. Empty when either vector is zero.
    pub fn contributions(
        &self,
        store: &VectorStore,
        query: &Embedding,
        row_id: &str,
    ) -> EngineResult<Vec<TermContribution>> {
        let vocab = store.require_vocabulary("contributions")?;
        store.check_query(query)?;
        let position = store.position(row_id)?;
        let row = store.row(row_id)?;

        let query_norm = query.norm();
        let row_norm = store.norm_at(position);
        if query_norm == 0.0 || row_norm == 0.0 {
            return Ok(Vec::new());
        }

        let Some(query_vec) = query.as_sparse() else {
            return Ok(Vec::new());
        };

        let mut contributions: Vec<TermContribution> = query_vec
            .iter()
            .filter_map(|(dimension, query_weight)| {
                let row_weight = row.get(dimension);
                if query_weight == 0.0 || row_weight == 0.0 {
                    return None;
                }
                let term = vocab.term(dimension)?;
                Some(TermContribution {
                    term: term.to_string(),
                    dimension,
                    query_weight,
                    row_weight,
                    contribution: query_weight * row_weight / (query_norm * row_norm),
                })
            })
            .collect();

        contributions.sort_by(|a, b| {
            b.contribution
                .total_cmp(&a.contribution)
                .then(a.dimension.cmp(&b.dimension))
        });

        Ok(contributions)
    }
}
