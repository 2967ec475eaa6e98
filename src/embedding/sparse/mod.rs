//! TF-IDF encoder.
//!
//! Weighting follows the common scikit-learn defaults: raw term counts, smoothed IDF
//! and L2-normalized rows. The vocabulary is sorted lexicographically, so dimension
//! order does not depend on corpus order.

/// Sparse encoder configuration.
pub mod config;
/// Text to term splitting.
pub mod tokenize;


pub use config::{SparseConfig, StopWords};
pub use tokenize::{ENGLISH_STOP_WORDS, Tokenizer};

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::embedding::encoder::Encoder;
use crate::embedding::kind::RepresentationKind;
use crate::error::{EngineError, EngineResult};
use crate::store::{DocId, Document, Embedding, SparseVector, VectorStore, Vocabulary};

#[derive(Debug, Clone)]
struct FittedTfidf {
    vocabulary: Vocabulary,
    idf: Vec<f32>,
}

/// TF-IDF encoder. The fitted vocabulary is its only state and never changes after `fit`.
#[derive(Debug, Clone)]
pub struct SparseEncoder {
    config: SparseConfig,
    tokenizer: Tokenizer,
    fitted: Option<FittedTfidf>,
}

impl SparseEncoder {
    pub fn new(config: SparseConfig) -> Self {
        let tokenizer = Tokenizer::new(&config);
        Self {
            config,
            tokenizer,
            fitted: None,
        }
    }

    /// Projects another corpus into the fitted vocabulary.
    pub fn transform(&self, corpus: &[Document]) -> EngineResult<VectorStore> {
        let fitted = self.fitted.as_ref().ok_or(EngineError::NotFitted)?;
        Self::encode_corpus(&self.tokenizer, &self.config, fitted, corpus)
    }

    /// Fitted vocabulary.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.fitted.as_ref().map(|f| &f.vocabulary)
    }

    /// Per-dimension IDF weights.
    pub fn idf(&self) -> Option<&[f32]> {
        self.fitted.as_ref().map(|f| f.idf.as_slice())
    }

    /// Returns `true` once a vocabulary has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn config(&self) -> &SparseConfig {
        &self.config
    }

    /// Terms the tokenizer extracts from `text`.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    fn learn(&self, tokenized: &[Vec<String>]) -> EngineResult<FittedTfidf> {
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in tokenized {
            let mut seen: Vec<&str> = tokens.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(EngineError::invalid_argument(
                "empty vocabulary: corpus produced no terms",
            ));
        }

        let n = tokenized.len() as f64;
        let idf = document_frequency
            .values()
            .map(|&df| {
                let df = df as f64;
                let weight = if self.config.smooth_idf {
                    ((1.0 + n) / (1.0 + df)).ln() + 1.0
                } else {
                    (n / df).ln() + 1.0
                };
                weight as f32
            })
            .collect();

        let vocabulary = Vocabulary::new(document_frequency.into_keys())?;

        Ok(FittedTfidf { vocabulary, idf })
    }

    fn encode_corpus(
        tokenizer: &Tokenizer,
        config: &SparseConfig,
        fitted: &FittedTfidf,
        corpus: &[Document],
    ) -> EngineResult<VectorStore> {
        let rows = corpus
            .iter()
            .map(|doc| Self::vectorize(config, fitted, &tokenizer.tokenize(&doc.text)))
            .collect::<EngineResult<Vec<_>>>()?;
        let ids: Vec<DocId> = corpus.iter().map(|doc| doc.id.clone()).collect();

        VectorStore::sparse(rows, ids, Some(fitted.vocabulary.clone()))
    }

    fn vectorize(
        config: &SparseConfig,
        fitted: &FittedTfidf,
        tokens: &[String],
    ) -> EngineResult<SparseVector> {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for token in tokens {
            if let Some(index) = fitted.vocabulary.index_of(token) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        let mut indices = Vec::with_capacity(counts.len());
        let mut values = Vec::with_capacity(counts.len());
        for (index, count) in counts {
            let tf = if config.sublinear_tf {
                1.0 + (count as f32).ln()
            } else {
                count as f32
            };
            indices.push(index as u32);
            values.push(tf * fitted.idf[index]);
        }

        if config.normalize {
            let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                for v in &mut values {
                    *v /= norm;
                }
            }
        }

        SparseVector::new(fitted.vocabulary.len(), indices, values)
    }
}

impl Default for SparseEncoder {
    fn default() -> Self {
        Self::new(SparseConfig::default())
    }
}

impl Encoder for SparseEncoder {
    fn kind(&self) -> RepresentationKind {
        RepresentationKind::Sparse
    }

    fn fit(&mut self, corpus: &[Document]) -> EngineResult<VectorStore> {
        if self.fitted.is_some() {
            return Err(EngineError::invalid_argument(
                "encoder is already fitted; use transform to encode another corpus",
            ));
        }

        let tokenized: Vec<Vec<String>> = corpus
            .iter()
            .map(|doc| self.tokenizer.tokenize(&doc.text))
            .collect();

        let fitted = self.learn(&tokenized)?;
        let rows = tokenized
            .iter()
            .map(|tokens| Self::vectorize(&self.config, &fitted, tokens))
            .collect::<EngineResult<Vec<_>>>()?;
        let ids: Vec<DocId> = corpus.iter().map(|doc| doc.id.clone()).collect();
        let store = VectorStore::sparse(rows, ids, Some(fitted.vocabulary.clone()))?;

        info!(
            documents = corpus.len(),
            vocabulary_size = fitted.vocabulary.len(),
            sparsity = store.sparsity(),
            "TF-IDF vocabulary fitted"
        );

        self.fitted = Some(fitted);
        Ok(store)
    }

    fn encode_query(&self, text: &str) -> EngineResult<Embedding> {
        let fitted = self.fitted.as_ref().ok_or(EngineError::NotFitted)?;
        let tokens = self.tokenizer.tokenize(text);

        let unseen = tokens
            .iter()
            .filter(|t| !fitted.vocabulary.contains(t))
            .count();
        debug!(
            tokens = tokens.len(),
            unseen, "Encoding sparse query (unseen terms carry no weight)"
        );

        Ok(Embedding::Sparse(Self::vectorize(
            &self.config,
            fitted,
            &tokens,
        )?))
    }
}
