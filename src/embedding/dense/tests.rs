use super::*;
use std::path::PathBuf;

fn stub_encoder() -> DenseEncoder {
    DenseEncoder::load(DenseConfig::stub()).expect("stub should load")
}

mod config_tests {
    use super::*;
    use crate::constants::{DEFAULT_DENSE_DIM, DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_IDENTIFIER};
    use crate::embedding::device::DevicePreference;

    #[test]
    fn test_dense_config_default() {
        let config = DenseConfig::default();
        assert_eq!(config.model_identifier, DEFAULT_MODEL_IDENTIFIER);
        assert_eq!(config.max_seq_len, DEFAULT_MAX_SEQ_LEN);
        assert_eq!(config.embedding_dim, DEFAULT_DENSE_DIM);
        assert_eq!(config.device, DevicePreference::Cpu);
        assert!(config.model_path.is_none());
        assert!(!config.testing_stub);
    }

    #[test]
    fn test_dense_config_builders() {
        let config = DenseConfig::stub()
            .with_max_seq_len(16)
            .with_embedding_dim(8)
            .with_device(DevicePreference::Accelerator);
        assert!(config.testing_stub);
        assert_eq!(config.max_seq_len, 16);
        assert_eq!(config.embedding_dim, 8);
        assert_eq!(config.device, DevicePreference::Accelerator);
    }

    #[test]
    fn test_dense_config_rejects_zero_max_seq_len() {
        let config = DenseConfig::stub().with_max_seq_len(0);
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_dense_config_missing_model_dir() {
        let config = DenseConfig::new("/nonexistent/minilm");
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_dense_config_unresolvable_identifier() {
        let config = DenseConfig {
            model_identifier: "not-a-local-directory".to_string(),
            ..Default::default()
        };
        assert!(config.model_dir().is_none());
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_dense_config_identifier_as_local_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = DenseConfig {
            model_identifier: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        assert_eq!(config.model_dir(), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_load_reports_missing_model_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        let err = DenseEncoder::load(DenseConfig::new(dir.path())).unwrap_err();
        match err {
            EmbeddingError::ModelLoadFailed { reason } => {
                assert!(reason.contains("model.safetensors"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_model_dir_prefers_explicit_path() {
        let config = DenseConfig::new("/models/minilm");
        assert_eq!(config.model_dir(), Some(PathBuf::from("/models/minilm")));
    }
}

mod stub_tests {
    use super::*;

    #[test]
    fn test_stub_encoder_shape() {
        let encoder = stub_encoder();
        assert!(encoder.is_stub());
        assert_eq!(encoder.kind(), RepresentationKind::Dense);
        assert_eq!(encoder.encode("hello world").unwrap().len(), 384);
    }

    #[test]
    fn test_stub_encoding_is_deterministic() {
        let encoder = stub_encoder();
        let a = encoder.encode("exact similarity").unwrap();
        let b = encoder.encode("exact similarity").unwrap();
        let c = encoder.encode("approximate similarity").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_stub_encoding_is_raw() {
        let encoder = stub_encoder();
        let v = encoder.encode("not normalized").unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() > 1e-3);
    }

    #[test]
    fn test_truncation_beyond_max_seq_len() {
        let encoder = DenseEncoder::load(DenseConfig::stub().with_max_seq_len(3)).unwrap();
        let a = encoder.encode("one two three four").unwrap();
        let b = encoder.encode("one two three five six").unwrap();
        let c = encoder.encode("one two four").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let encoder = stub_encoder();
        let v = encoder.encode("   ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_token_lengths_before_truncation() {
        let encoder = DenseEncoder::load(DenseConfig::stub().with_max_seq_len(2)).unwrap();
        let lengths = encoder.token_lengths(&["a b c", "", "one"]).unwrap();
        assert_eq!(lengths, vec![3, 0, 1]);
    }

    #[test]
    fn test_encode_batch_preserves_order() {
        let encoder = stub_encoder();
        let batch = encoder.encode_batch(&["first", "second"]).unwrap();
        assert_eq!(batch[0], encoder.encode("first").unwrap());
        assert_eq!(batch[1], encoder.encode("second").unwrap());
    }

    #[test]
    fn test_debug_output() {
        let debug_str = format!("{:?}", stub_encoder());
        assert!(debug_str.contains("DenseEncoder"));
        assert!(debug_str.contains("Stub"));
    }
}

mod normalize_tests {
    use super::*;

    #[test]
    fn test_normalize_produces_unit_rows() {
        let encoder = stub_encoder();
        let raw = encoder.encode_batch(&["alpha", "beta"]).unwrap();
        for row in encoder.normalize(raw) {
            let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_normalize_leaves_zero_rows() {
        let encoder = stub_encoder();
        let rows = encoder.normalize(vec![vec![0.0, 0.0], vec![3.0, 4.0]]);
        assert_eq!(rows[0], vec![0.0, 0.0]);
        assert_eq!(rows[1], vec![0.6, 0.8]);
    }

    #[test]
    fn test_normalize_l2_in_place() {
        let mut v = vec![0.0, 5.0];
        normalize_l2(&mut v);
        assert_eq!(v, vec![0.0, 1.0]);
    }
}

mod encoder_trait_tests {
    use super::*;
    use crate::scoring::SimilarityEngine;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new("d1", "the quick brown fox"),
            Document::new("d2", "lazy dogs sleep"),
        ]
    }

    #[test]
    fn test_fit_builds_dense_store_of_raw_vectors() {
        let mut encoder = stub_encoder();
        let store = encoder.fit(&corpus()).unwrap();
        assert_eq!(store.kind(), RepresentationKind::Dense);
        assert_eq!(store.len(), 2);
        assert_eq!(store.dim(), 384);
        let expected = encoder.encode("lazy dogs sleep").unwrap();
        assert_eq!(store.row("d2").unwrap().as_dense().unwrap(), expected.as_slice());
    }

    #[test]
    fn test_fit_normalized_rows_are_unit_length() {
        let encoder = stub_encoder();
        let store = encoder.fit_normalized(&corpus()).unwrap();
        for (_, row) in store.iter() {
            assert!((row.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_fit_on_empty_corpus_keeps_embedding_dim() {
        let mut encoder = stub_encoder();
        let store = encoder.fit(&[]).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.dim(), 384);

        let query = encoder.encode_query("lazy dogs sleep").unwrap();
        let scores = SimilarityEngine::new().query_similarity(&store, &query).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_encode_query_needs_no_fit() {
        let encoder = stub_encoder();
        let query = encoder.encode_query("lazy dogs sleep").unwrap();
        assert_eq!(query.kind(), RepresentationKind::Dense);
        assert_eq!(query.dim(), 384);
    }
}
