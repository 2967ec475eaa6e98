use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Vector representation produced by an encoder and held by a store.
pub enum RepresentationKind {
    /// TF-IDF style vectors over a named vocabulary.
    Sparse,
    /// Model embeddings; dimensions carry no label.
    Dense,
}

impl RepresentationKind {
    /// Lowercase name used in config and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepresentationKind::Sparse => "sparse",
            RepresentationKind::Dense => "dense",
        }
    }
}

impl std::fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepresentationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sparse" | "tfidf" | "tf-idf" => Ok(RepresentationKind::Sparse),
            "dense" | "embedding" => Ok(RepresentationKind::Dense),
            other => Err(format!(
                "unknown representation '{other}' (expected 'sparse' or 'dense')"
            )),
        }
    }
}
