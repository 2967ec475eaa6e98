//! Cross-cutting, shared constants.
//!
//! Encoder defaults live here so config parsing, the encoders and the binary agree
//! on them without importing each other.

/// Default number of hits returned by a search.
pub const DEFAULT_TOP_K: usize = 5;

/// Default dense model (a 384-dimensional BERT bi-encoder).
pub const DEFAULT_MODEL_IDENTIFIER: &str = "multi-qa-MiniLM-L6-cos-v1";

/// Output dimension of the default dense model; also the stub embedding size.
pub const DEFAULT_DENSE_DIM: usize = 384;

/// Token limit applied before dense encoding.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Tokens shorter than this are dropped by the sparse tokenizer.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;

/// Absolute tolerance used when comparing cosine scores.
pub const SCORE_EPSILON: f32 = 1e-5;
