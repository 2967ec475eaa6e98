use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ordered, duplicate-free terms; position `i` names sparse dimension `i`.
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Builds a vocabulary, rejecting duplicate terms.
    pub fn new<I, S>(terms: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(terms.len());

        for (i, term) in terms.iter().enumerate() {
            if index.insert(term.clone(), i).is_some() {
                return Err(EngineError::invalid_argument(format!(
                    "duplicate vocabulary term '{term}'"
                )));
            }
        }

        Ok(Self { terms, index })
    }

    /// Number of terms (= sparse dimensionality).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Dimension index of `term`.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Term at dimension `index`.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Returns `true` if `term` is in the vocabulary.
    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Terms in dimension order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Iterates `(index, term)` in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.terms.iter().enumerate().map(|(i, t)| (i, t.as_str()))
    }
}

impl Serialize for Vocabulary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.terms.serialize(serializer)
    }
}
