use candle_core::{Device, Result, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};

use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::ModelFiles;

/// BERT encoder with mean pooling over the token axis.
pub(crate) struct BertEmbedder {
    bert: BertModel,
    hidden_size: usize,
}

impl BertEmbedder {
    pub fn load(files: &ModelFiles, device: &Device) -> std::result::Result<Self, EmbeddingError> {
        let config_content = std::fs::read_to_string(&files.config)?;
        let config: Config =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to parse {}: {}", files.config.display(), e),
            })?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights.clone()], DTYPE, device)?
        };

        // Sentence-transformers exports omit the "bert." prefix; HF checkpoints keep it.
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)
        } else {
            BertModel::load(vb, &config)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to load BERT weights: {}", e),
        })?;

        Ok(Self {
            bert,
            hidden_size: config.hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// `token_ids` is `[1, seq_len]`; returns the pooled `[hidden_size]` vector.
    pub fn embed(&self, token_ids: &Tensor) -> Result<Vec<f32>> {
        let token_type_ids = token_ids.zeros_like()?;
        let hidden_states = self.bert.forward(token_ids, &token_type_ids, None)?;
        hidden_states.mean(1)?.squeeze(0)?.to_vec1::<f32>()
    }
}
