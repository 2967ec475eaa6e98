use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constants::DEFAULT_MIN_TOKEN_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Stop-word filtering applied by the tokenizer.
pub enum StopWords {
    /// Keep every token.
    #[default]
    None,
    /// Drop common English function words.
    English,
}

impl FromStr for StopWords {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "false" | "0" => Ok(StopWords::None),
            "english" | "true" | "1" => Ok(StopWords::English),
            other => Err(format!(
                "unknown stop-word list '{other}' (expected 'none' or 'english')"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Configuration for [`SparseEncoder`](super::SparseEncoder).
pub struct SparseConfig {
    /// Lowercase text before tokenizing.
    pub lowercase: bool,
    /// Tokens with fewer characters are dropped.
    pub min_token_len: usize,
    /// Stop-word list.
    pub stop_words: StopWords,
    /// `idf = ln((1 + n) / (1 + df)) + 1` when set, `ln(n / df) + 1` otherwise.
    pub smooth_idf: bool,
    /// Use `1 + ln(tf)` instead of raw counts.
    pub sublinear_tf: bool,
    /// L2-normalize every row and query.
    pub normalize: bool,
}

impl Default for SparseConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            stop_words: StopWords::None,
            smooth_idf: true,
            sublinear_tf: false,
            normalize: true,
        }
    }
}

impl SparseConfig {
    /// Default config with English stop words removed.
    pub fn english() -> Self {
        Self {
            stop_words: StopWords::English,
            ..Default::default()
        }
    }
}

impl From<&EngineConfig> for SparseConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            stop_words: config.stop_words,
            ..Default::default()
        }
    }
}
