//! Shared corpora for integration tests.

use simscore::{DocId, Document};

/// Three-document corpus over a five-term vocabulary.
pub fn movie_corpus() -> Vec<Document> {
    vec![
        Document::new("m1", "action adventure"),
        Document::new("m2", "romance drama"),
        Document::new("m3", "action sci-fi"),
    ]
}

/// Short technical passages with some vocabulary overlap.
pub fn passage_corpus() -> Vec<Document> {
    vec![
        Document::new(
            "rust",
            "Rust guarantees memory safety without a garbage collector",
        ),
        Document::new(
            "gc",
            "A garbage collector reclaims memory that is no longer reachable",
        ),
        Document::new(
            "tfidf",
            "TF-IDF weighs a term by its frequency and its rarity across documents",
        ),
        Document::new(
            "cosine",
            "Cosine similarity compares the direction of two vectors",
        ),
        Document::new("empty", ""),
    ]
}

pub fn ids(names: &[&str]) -> Vec<DocId> {
    names.iter().map(|n| DocId::from(*n)).collect()
}
