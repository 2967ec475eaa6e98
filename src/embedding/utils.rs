//! Model directory layout helpers.

use std::path::{Path, PathBuf};

use tokenizers::Tokenizer;

use crate::embedding::error::EmbeddingError;

/// Files a sentence-embedding model directory must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    /// `config.json` (BERT hyper-parameters).
    pub config: PathBuf,
    /// `model.safetensors`.
    pub weights: PathBuf,
    /// `tokenizer.json`.
    pub tokenizer: PathBuf,
}

impl ModelFiles {
    /// Resolves and checks the expected files inside `model_dir`.
    pub fn locate(model_dir: &Path) -> Result<Self, EmbeddingError> {
        if !model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: model_dir.to_path_buf(),
            });
        }

        let files = Self {
            config: model_dir.join("config.json"),
            weights: model_dir.join("model.safetensors"),
            tokenizer: model_dir.join("tokenizer.json"),
        };

        for path in [&files.config, &files.weights, &files.tokenizer] {
            if !path.is_file() {
                return Err(EmbeddingError::ModelLoadFailed {
                    reason: format!("missing {} in {}", file_label(path), model_dir.display()),
                });
            }
        }

        Ok(files)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Loads `tokenizer.json` without truncation; callers cut token ids themselves.
pub fn load_tokenizer(path: &Path) -> Result<Tokenizer, EmbeddingError> {
    let mut tokenizer =
        Tokenizer::from_file(path).map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("failed to load tokenizer from {}: {}", path.display(), e),
        })?;

    tokenizer
        .with_truncation(None)
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("failed to disable truncation: {}", e),
        })?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}
