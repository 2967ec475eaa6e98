//! Engine configuration.
//!
//! Every setting has a default. Override with `SIMSCORE_*` environment variables or a
//! JSON object; unrecognized JSON keys are ignored.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_IDENTIFIER, DEFAULT_TOP_K};
use crate::embedding::{DevicePreference, RepresentationKind, StopWords};

/// Encoder and ranking configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which encoder to build. Default: `sparse`.
    pub representation: RepresentationKind,

    /// Token limit for the dense encoder. Default: `256`.
    pub max_sequence_length: usize,

    /// Dense encoder device (`cpu` or `accelerator`). Default: `cpu`.
    pub device: DevicePreference,

    /// Dense model name, or a local model directory.
    pub model_identifier: String,

    /// Explicit dense model directory (takes precedence over `model_identifier`).
    pub model_path: Option<PathBuf>,

    /// Hits returned when the caller does not pass `k`. Default: `5`.
    pub top_k: usize,

    /// Stop-word filtering for the sparse encoder. Default: `none`.
    pub stop_words: StopWords,

    /// Run the dense encoder's deterministic stub backend.
    pub dense_stub: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            representation: RepresentationKind::Sparse,
            max_sequence_length: DEFAULT_MAX_SEQ_LEN,
            device: DevicePreference::Cpu,
            model_identifier: DEFAULT_MODEL_IDENTIFIER.to_string(),
            model_path: None,
            top_k: DEFAULT_TOP_K,
            stop_words: StopWords::None,
            dense_stub: false,
        }
    }
}

impl EngineConfig {
    const ENV_REPRESENTATION: &'static str = "SIMSCORE_REPRESENTATION";
    const ENV_MAX_SEQUENCE_LENGTH: &'static str = "SIMSCORE_MAX_SEQUENCE_LENGTH";
    const ENV_DEVICE: &'static str = "SIMSCORE_DEVICE";
    const ENV_MODEL_IDENTIFIER: &'static str = "SIMSCORE_MODEL_IDENTIFIER";
    const ENV_MODEL_PATH: &'static str = "SIMSCORE_MODEL_PATH";
    const ENV_TOP_K: &'static str = "SIMSCORE_TOP_K";
    const ENV_STOP_WORDS: &'static str = "SIMSCORE_STOP_WORDS";
    const ENV_DENSE_STUB: &'static str = "SIMSCORE_DENSE_STUB";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let representation =
            Self::parse_from_env(Self::ENV_REPRESENTATION, defaults.representation)?;
        let max_sequence_length =
            Self::parse_from_env(Self::ENV_MAX_SEQUENCE_LENGTH, defaults.max_sequence_length)?;
        let device = Self::parse_from_env(Self::ENV_DEVICE, defaults.device)?;
        let model_identifier =
            Self::parse_string_from_env(Self::ENV_MODEL_IDENTIFIER, defaults.model_identifier);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let top_k = Self::parse_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let stop_words = Self::parse_from_env(Self::ENV_STOP_WORDS, defaults.stop_words)?;
        let dense_stub = Self::parse_from_env(Self::ENV_DENSE_STUB, defaults.dense_stub)?;

        Ok(Self {
            representation,
            max_sequence_length,
            device,
            model_identifier,
            model_path,
            top_k,
            stop_words,
            dense_stub,
        })
    }

    /// Parses a JSON object; missing keys take defaults and unknown keys are ignored.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Same as [`from_json_str`](Self::from_json_str) for an already-parsed value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Validates limits and the model path (does not load anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_sequence_length == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_sequence_length",
                value: self.max_sequence_length.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: "top_k",
                value: self.top_k.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) if !value.trim().is_empty() => {
                value
                    .trim()
                    .parse()
                    .map_err(|e: T::Err| ConfigError::InvalidValue {
                        name: var_name,
                        value: value.clone(),
                        reason: e.to_string(),
                    })
            }
            _ => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}
