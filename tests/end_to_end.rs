//! End-to-end tests over the sparse (TF-IDF) pipeline.

mod common;

use common::fixtures::{ids, movie_corpus, passage_corpus};
use simscore::{
    Attributor, Encoder, EngineError, Retriever, SCORE_EPSILON, SimilarityEngine, SparseEncoder,
    SparseVector, VectorStore, top_k,
};

fn fitted_movies() -> (SparseEncoder, VectorStore) {
    let mut encoder = SparseEncoder::default();
    let store = encoder.fit(&movie_corpus()).expect("fit should succeed");
    (encoder, store)
}

#[test]
fn test_movie_corpus_ranks_action_titles_first() {
    let (encoder, store) = fitted_movies();
    let query = encoder.encode_query("action thriller").unwrap();

    let scores = SimilarityEngine::new()
        .query_similarity(&store, &query)
        .unwrap();
    let m1 = scores.get("m1").unwrap();
    let m2 = scores.get("m2").unwrap();
    let m3 = scores.get("m3").unwrap();
    assert!(m1 > m2);
    assert!(m3 > m2);

    let ranked = top_k(&scores, 2).unwrap();
    let ranked_ids: Vec<&str> = ranked.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ranked_ids, vec!["m1", "m3"]);
}

#[test]
fn test_movie_corpus_sparsity() {
    let (encoder, store) = fitted_movies();
    assert_eq!(encoder.vocabulary().unwrap().len(), 5);
    assert_eq!(store.nnz(), 6);
    assert!((store.sparsity() - 40.0).abs() < 1e-9);
}

#[test]
fn test_pairwise_symmetry_and_self_similarity() {
    let mut encoder = SparseEncoder::default();
    let store = encoder.fit(&passage_corpus()).unwrap();
    let matrix = SimilarityEngine::new().pairwise(&store);

    assert!(matrix.is_symmetric());
    for (i, id) in store.ids().iter().enumerate() {
        let expected = if id.as_str() == "empty" { 0.0 } else { 1.0 };
        assert!((matrix.get(i, i).unwrap() - expected).abs() <= SCORE_EPSILON);
    }
    assert!(matrix.by_id("rust", "gc").unwrap() > matrix.by_id("rust", "cosine").unwrap());
}

#[test]
fn test_top_k_is_idempotent_over_real_scores() {
    let mut encoder = SparseEncoder::default();
    let store = encoder.fit(&passage_corpus()).unwrap();
    let query = encoder.encode_query("memory garbage collector").unwrap();
    let scores = SimilarityEngine::new()
        .query_similarity(&store, &query)
        .unwrap();

    let first = top_k(&scores, 3).unwrap();
    let second = top_k(&scores, 3).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    for pair in first.hits().windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_round_trip_rows() {
    let rows = vec![
        SparseVector::new(6, vec![0, 5], vec![0.25, -1.5]).unwrap(),
        SparseVector::new(6, vec![], vec![]).unwrap(),
        SparseVector::new(6, vec![1, 2, 3], vec![3.0, 2.0, 1.0]).unwrap(),
    ];
    let store = VectorStore::sparse(rows.clone(), ids(&["a", "b", "c"]), None).unwrap();

    for (id, expected) in ["a", "b", "c"].iter().zip(rows) {
        assert_eq!(store.row(id).unwrap().as_sparse(), Some(&expected));
    }
}

#[test]
fn test_attribution_matches_raw_row_values() {
    let (encoder, store) = fitted_movies();
    let vocab = encoder.vocabulary().unwrap();
    let attribution = Attributor::new()
        .attribute(&store, "m3", &["sci-fi", "action", "horror"])
        .unwrap();

    let row = store.row("m3").unwrap();
    for term in ["sci-fi", "action"] {
        let dim = vocab.index_of(term).unwrap();
        assert_eq!(attribution.get(term), Some(row.get(dim)));
    }
    assert_eq!(attribution.unknown, vec!["horror".to_string()]);
    assert!(matches!(
        attribution.errors().as_slice(),
        [EngineError::UnknownTerm { term }] if term == "horror"
    ));
}

#[test]
fn test_row_terms_lists_non_zero_terms() {
    let (_, store) = fitted_movies();
    assert_eq!(store.row_terms("m3").unwrap(), vec!["action", "sci-fi"]);
}

#[test]
fn test_query_against_wrong_store_is_rejected() {
    let (encoder, _) = fitted_movies();
    let mut other = SparseEncoder::default();
    let other_store = other.fit(&passage_corpus()).unwrap();

    let query = encoder.encode_query("action").unwrap();
    assert!(matches!(
        SimilarityEngine::new().query_similarity(&other_store, &query),
        Err(EngineError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_retriever_end_to_end() {
    let mut retriever = Retriever::new(SparseEncoder::default());
    retriever.index(&passage_corpus()).unwrap();

    let hits = retriever.search("how does a garbage collector work", 2).unwrap();
    let mut hit_ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    hit_ids.sort_unstable();
    assert_eq!(hit_ids, vec!["gc", "rust"]);
    let gc = hits.iter().find(|h| h.id.as_str() == "gc").unwrap();
    assert!(gc.text.starts_with("A garbage collector"));

    let contributions = retriever
        .explain_query("garbage collector", "gc")
        .unwrap();
    let terms: Vec<&str> = contributions.iter().map(|c| c.term.as_str()).collect();
    assert!(terms.contains(&"garbage"));
    assert!(terms.contains(&"collector"));
}
