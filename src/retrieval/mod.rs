//! Text-in, hits-out search over an indexed corpus.
//!
//! [`Retriever`] wires an [`Encoder`] to the scoring stack:
//! encode corpus -> [`VectorStore`] -> [`SimilarityEngine`] -> [`Ranker`], joining the
//! ranked identifiers back to document text. Attribution helpers are available for
//! sparse encoders.


use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::embedding::{AnyEncoder, Encoder};
use crate::error::{EngineError, EngineResult};
use crate::scoring::{
    Attribution, Attributor, QueryScores, RankedResult, Ranker, SimilarityEngine,
    TermContribution,
};
use crate::store::{DocId, Document, VectorStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A ranked document.
pub struct SearchHit {
    pub id: DocId,
    pub score: f32,
    /// 1-based position in the result.
    pub rank: usize,
    pub text: String,
}

#[derive(Debug)]
struct Index {
    store: VectorStore,
    texts: Vec<String>,
}

#[derive(Debug)]
/// Indexes one corpus and answers queries against it.
pub struct Retriever<E: Encoder = AnyEncoder> {
    encoder: E,
    engine: SimilarityEngine,
    ranker: Ranker,
    attributor: Attributor,
    index: Option<Index>,
}

impl Retriever<AnyEncoder> {
    /// Builds the configured encoder and ranker.
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let encoder = AnyEncoder::from_config(config)?;
        Ok(Self::new(encoder).with_ranker(Ranker::from(config)))
    }
}

impl<E: Encoder> Retriever<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            engine: SimilarityEngine::new(),
            ranker: Ranker::default(),
            attributor: Attributor::new(),
            index: None,
        }
    }

    pub fn with_ranker(mut self, ranker: Ranker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Fits the encoder on `corpus` and keeps the documents for result joins.
    pub fn index(&mut self, corpus: &[Document]) -> EngineResult<&VectorStore> {
        let store = self.encoder.fit(corpus)?;
        let texts = corpus.iter().map(|doc| doc.text.clone()).collect();

        info!(
            kind = %store.kind(),
            documents = store.len(),
            dim = store.dim(),
            sparsity = store.sparsity(),
            "Corpus indexed"
        );

        let index = self.index.insert(Index { store, texts });
        Ok(&index.store)
    }

    /// Returns `true` once [`index`](Self::index) has succeeded.
    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// The indexed store, if any.
    pub fn store(&self) -> Option<&VectorStore> {
        self.index.as_ref().map(|index| &index.store)
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Scores `text` against every indexed row.
    pub fn scores(&self, text: &str) -> EngineResult<QueryScores> {
        let index = self.require_index()?;
        let query = self.encoder.encode_query(text)?;
        self.engine.query_similarity(&index.store, &query)
    }

    /// The `k` best documents for `text`.
    pub fn search(&self, text: &str, k: usize) -> EngineResult<Vec<SearchHit>> {
        let index = self.require_index()?;
        let scores = self.scores(text)?;
        let ranked = self.ranker.rank_k(&scores, k)?;

        debug!(query_len = text.len(), k, hits = ranked.len(), "Search complete");

        Ok(Self::join(index, ranked, None))
    }

    /// Runs [`search`](Self::search) for each text in parallel. One result per text.
    pub fn search_batch(&self, texts: &[&str], k: usize) -> Vec<EngineResult<Vec<SearchHit>>>
    where
        E: Sync,
    {
        texts.par_iter().map(|text| self.search(text, k)).collect()
    }

    /// The `k` documents most similar to indexed row `id`, excluding the row itself.
    pub fn similar_to(&self, id: &str, k: usize) -> EngineResult<Vec<SearchHit>> {
        if k < 1 {
            return Err(EngineError::invalid_argument(format!(
                "k must be at least 1, got {k}"
            )));
        }
        let index = self.require_index()?;
        let query = index.store.row(id)?;
        let scores = self.engine.query_similarity(&index.store, query)?;
        let ranked = self.ranker.rank_k(&scores, k.saturating_add(1))?;

        let mut hits = Self::join(index, ranked, Some(id));
        hits.truncate(k);
        Ok(hits)
    }

    /// Weights of `terms` in indexed row `id` (sparse stores only).
    pub fn explain<S: AsRef<str>>(&self, id: &str, terms: &[S]) -> EngineResult<Attribution> {
        let index = self.require_index()?;
        self.attributor.attribute(&index.store, id, terms)
    }

    /// Per-term breakdown of the score between `text` and indexed row `id`.
    pub fn explain_query(&self, text: &str, id: &str) -> EngineResult<Vec<TermContribution>> {
        let index = self.require_index()?;
        let query = self.encoder.encode_query(text)?;
        self.attributor.contributions(&index.store, &query, id)
    }

    fn require_index(&self) -> EngineResult<&Index> {
        self.index.as_ref().ok_or(EngineError::NotFitted)
    }

    fn join(index: &Index, ranked: RankedResult, exclude: Option<&str>) -> Vec<SearchHit> {
        ranked
            .into_iter()
            .filter(|hit| exclude.is_none_or(|id| hit.id.as_str() != id))
            .enumerate()
            .map(|(position, hit)| SearchHit {
                text: index.texts.get(hit.index).cloned().unwrap_or_default(),
                id: hit.id,
                score: hit.score,
                rank: position + 1,
            })
            .collect()
    }
}
