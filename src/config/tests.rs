use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_simscore_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("SIMSCORE_REPRESENTATION");
        env::remove_var("SIMSCORE_MAX_SEQUENCE_LENGTH");
        env::remove_var("SIMSCORE_DEVICE");
        env::remove_var("SIMSCORE_MODEL_IDENTIFIER");
        env::remove_var("SIMSCORE_MODEL_PATH");
        env::remove_var("SIMSCORE_TOP_K");
        env::remove_var("SIMSCORE_STOP_WORDS");
        env::remove_var("SIMSCORE_DENSE_STUB");
    }
}

#[test]
fn test_default_config() {
    let config = EngineConfig::default();

    assert_eq!(config.representation, RepresentationKind::Sparse);
    assert_eq!(config.max_sequence_length, 256);
    assert_eq!(config.device, DevicePreference::Cpu);
    assert_eq!(config.model_identifier, "multi-qa-MiniLM-L6-cos-v1");
    assert!(config.model_path.is_none());
    assert_eq!(config.top_k, 5);
    assert_eq!(config.stop_words, StopWords::None);
    assert!(!config.dense_stub);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_simscore_env();

    let config = EngineConfig::from_env().expect("should parse with defaults");
    assert_eq!(config, EngineConfig::default());
}

#[test]
#[serial]
fn test_full_env_parse() {
    clear_simscore_env();

    let config = with_env_vars(
        &[
            ("SIMSCORE_REPRESENTATION", "dense"),
            ("SIMSCORE_MAX_SEQUENCE_LENGTH", "128"),
            ("SIMSCORE_DEVICE", "accelerator"),
            ("SIMSCORE_MODEL_IDENTIFIER", "all-MiniLM-L6-v2"),
            ("SIMSCORE_MODEL_PATH", "/models/minilm"),
            ("SIMSCORE_TOP_K", "10"),
            ("SIMSCORE_STOP_WORDS", "english"),
            ("SIMSCORE_DENSE_STUB", "true"),
        ],
        EngineConfig::from_env,
    )
    .expect("should parse full config");

    assert_eq!(config.representation, RepresentationKind::Dense);
    assert_eq!(config.max_sequence_length, 128);
    assert_eq!(config.device, DevicePreference::Accelerator);
    assert_eq!(config.model_identifier, "all-MiniLM-L6-v2");
    assert_eq!(config.model_path, Some(PathBuf::from("/models/minilm")));
    assert_eq!(config.top_k, 10);
    assert_eq!(config.stop_words, StopWords::English);
    assert!(config.dense_stub);
}

#[test]
#[serial]
fn test_from_env_blank_values_use_defaults() {
    clear_simscore_env();

    let config = with_env_vars(
        &[("SIMSCORE_TOP_K", "  "), ("SIMSCORE_MODEL_PATH", "")],
        EngineConfig::from_env,
    )
    .expect("blank values fall back to defaults");

    assert_eq!(config.top_k, 5);
    assert!(config.model_path.is_none());
}

#[test]
#[serial]
fn test_invalid_top_k_not_number() {
    clear_simscore_env();

    let result = with_env_vars(&[("SIMSCORE_TOP_K", "many")], EngineConfig::from_env);

    match result {
        Err(ConfigError::InvalidValue { name, value, .. }) => {
            assert_eq!(name, "SIMSCORE_TOP_K");
            assert_eq!(value, "many");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_invalid_representation() {
    clear_simscore_env();

    let result = with_env_vars(
        &[("SIMSCORE_REPRESENTATION", "hybrid")],
        EngineConfig::from_env,
    );
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            name: "SIMSCORE_REPRESENTATION",
            ..
        })
    ));
}

#[test]
#[serial]
fn test_invalid_device() {
    clear_simscore_env();

    let result = with_env_vars(&[("SIMSCORE_DEVICE", "tpu")], EngineConfig::from_env);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            name: "SIMSCORE_DEVICE",
            ..
        })
    ));
}

#[test]
fn test_from_json_ignores_unknown_keys() {
    let config = EngineConfig::from_json_str(
        r#"{"max_sequence_length": 64, "device": "cpu", "model_identifier": "local-model", "pooling": "mean"}"#,
    )
    .expect("unknown keys should be ignored");

    assert_eq!(config.max_sequence_length, 64);
    assert_eq!(config.device, DevicePreference::Cpu);
    assert_eq!(config.model_identifier, "local-model");
    assert_eq!(config.top_k, 5);
}

#[test]
fn test_from_json_empty_object_is_default() {
    let config = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_from_value() {
    let config = EngineConfig::from_value(serde_json::json!({
        "representation": "dense",
        "dense_stub": true,
        "stop_words": "english",
    }))
    .unwrap();

    assert_eq!(config.representation, RepresentationKind::Dense);
    assert!(config.dense_stub);
    assert_eq!(config.stop_words, StopWords::English);
}

#[test]
fn test_from_json_rejects_bad_types() {
    assert!(matches!(
        EngineConfig::from_json_str(r#"{"max_sequence_length": "long"}"#),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        EngineConfig::from_json_str("not json"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_validate_success_with_defaults() {
    assert!(EngineConfig::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_limits() {
    let config = EngineConfig {
        max_sequence_length: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue {
            name: "max_sequence_length",
            ..
        })
    ));

    let config = EngineConfig {
        top_k: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { name: "top_k", .. })
    ));
}

#[test]
fn test_validate_nonexistent_model_path() {
    let config = EngineConfig {
        model_path: Some(PathBuf::from("/nonexistent/model")),
        ..Default::default()
    };

    match config.validate() {
        Err(ConfigError::PathNotFound { path }) => {
            assert_eq!(path, PathBuf::from("/nonexistent/model"));
        }
        other => panic!("expected PathNotFound, got {other:?}"),
    }
}

#[test]
fn test_validate_model_path_is_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = EngineConfig {
        model_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_model_path_is_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig {
        model_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::InvalidValue {
        name: "SIMSCORE_TOP_K",
        value: "many".to_string(),
        reason: "invalid digit found in string".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("SIMSCORE_TOP_K"));
    assert!(msg.contains("many"));

    let err = ConfigError::PathNotFound {
        path: PathBuf::from("/missing"),
    };
    assert!(err.to_string().contains("/missing"));
}
