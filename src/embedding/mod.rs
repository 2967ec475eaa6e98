//! Vector producers.
//!
//! - [`sparse`] fits a TF-IDF vocabulary and projects text into it.
//! - [`dense`] wraps a pretrained sentence-embedding model.
//! - [`AnyEncoder`] picks one of the two from a [`RepresentationKind`].

/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Sentence-embedding encoder.
pub mod dense;
mod encoder;
mod error;
mod kind;
/// TF-IDF encoder.
pub mod sparse;
/// Model directory helpers.
pub mod utils;

pub use dense::{DenseConfig, DenseEncoder, normalize_l2};
pub use device::{DevicePreference, select_device};
pub use encoder::{AnyEncoder, Encoder};
pub use error::EmbeddingError;
pub use kind::RepresentationKind;
pub use sparse::{SparseConfig, SparseEncoder, StopWords};
