use std::cmp::Ordering;

use tracing::debug;

use crate::config::EngineConfig;
use crate::constants::DEFAULT_TOP_K;
use crate::error::{EngineError, EngineResult};

use super::types::{QueryScores, RankedHit, RankedResult};

/// The `k` best entries of `scores`, score descending, ties by row index ascending.
///
/// NaN scores rank after every number. Returns `min(k, scores.len())` hits.
pub fn top_k(scores: &QueryScores, k: usize) -> EngineResult<RankedResult> {
    select(scores, k, None)
}

/// Ranking order: higher score first, NaN last, then lower row index first.
fn rank_order(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    let (a_index, a_score) = *a;
    let (b_index, b_score) = *b;
    let by_score = match (a_score.is_nan(), b_score.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b_score.partial_cmp(&a_score).unwrap_or(Ordering::Equal),
    };
    by_score.then(a_index.cmp(&b_index))
}

fn select(scores: &QueryScores, k: usize, min_score: Option<f32>) -> EngineResult<RankedResult> {
    if k < 1 {
        return Err(EngineError::invalid_argument(format!(
            "k must be at least 1, got {k}"
        )));
    }

    let mut candidates: Vec<(usize, f32)> = scores
        .iter()
        .enumerate()
        .map(|(index, (_, score))| (index, score))
        .filter(|(_, score)| min_score.is_none_or(|min| *score >= min))
        .collect();

    if candidates.len() > k {
        candidates.select_nth_unstable_by(k - 1, rank_order);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(rank_order);

    let hits: Vec<RankedHit> = candidates
        .into_iter()
        .enumerate()
        .filter_map(|(position, (index, score))| {
            scores.at(index).map(|(id, _)| RankedHit {
                id: id.clone(),
                score,
                rank: position + 1,
                index,
            })
        })
        .collect();

    debug!(
        candidates = scores.len(),
        k,
        returned = hits.len(),
        "Ranked candidates"
    );

    Ok(RankedResult::new(hits))
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Top-k selection with a default `k` and an optional score floor.
pub struct Ranker {
    top_k: usize,
    min_score: Option<f32>,
}

impl Default for Ranker {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_score: None,
        }
    }
}

impl Ranker {
    /// Ranker returning at most `top_k` hits.
    pub fn new(top_k: usize) -> EngineResult<Self> {
        if top_k < 1 {
            return Err(EngineError::invalid_argument(format!(
                "top_k must be at least 1, got {top_k}"
            )));
        }
        Ok(Self {
            top_k,
            min_score: None,
        })
    }

    /// Drops candidates scoring below `min_score` before truncation.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn min_score(&self) -> Option<f32> {
        self.min_score
    }

    /// Ranks with the configured `k` and floor.
    pub fn rank(&self, scores: &QueryScores) -> EngineResult<RankedResult> {
        select(scores, self.top_k, self.min_score)
    }

    /// Ranks with an explicit `k` (the configured floor still applies).
    pub fn rank_k(&self, scores: &QueryScores, k: usize) -> EngineResult<RankedResult> {
        select(scores, k, self.min_score)
    }

    /// Ranks with the configured `k`, keeping only scores `>= min_score`.
    pub fn rank_with_threshold(
        &self,
        scores: &QueryScores,
        min_score: f32,
    ) -> EngineResult<RankedResult> {
        select(scores, self.top_k, Some(min_score))
    }
}

impl From<&EngineConfig> for Ranker {
    fn from(config: &EngineConfig) -> Self {
        Self {
            top_k: config.top_k.max(1),
            min_score: None,
        }
    }
}
