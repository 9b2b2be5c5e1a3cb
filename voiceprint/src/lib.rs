//! Speaker embedding extraction for voice verification.
//!
//! # Architecture
//!
//! The pipeline converts a conditioned 16 kHz clip into a fixed 512-dim
//! [`Embedding`]:
//!
//! 1. [`EmbeddingExtractor::extract`]: windows the clip and runs one
//!    inference call per window through the [`InferenceEngine`]
//!    collaborator, then averages and L2-normalizes
//! 2. If the model cannot be loaded or an inference call fails, the
//!    deterministic [`spectral_fingerprint`] is substituted for that
//!    attempt — extraction always succeeds for non-empty input
//!
//! # Source compatibility
//!
//! Neural and spectral embeddings are structurally identical but
//! semantically incompatible. Every [`Embedding`] carries its
//! [`EmbeddingSource`]; [`Embedding::similarity`] scores cross-source
//! pairs as 0 so a live clip is only ever matched against profiles built
//! by the same path.
//!
//! # Model loading
//!
//! The inference handle lives in an explicit [`ModelContext`] owned by the
//! application. Loading is memoized: the first request triggers it,
//! concurrent requests await the same in-flight load, and a definitive
//! failure is remembered so later calls fall back immediately.

mod cosine;
mod embedding;
mod error;
mod extract;
mod inference;
mod spectral;

pub use cosine::cosine_similarity;
pub use embedding::{l2_normalize, Embedding, EmbeddingSource};
pub use error::VoiceprintError;
pub use extract::{
    EmbeddingExtractor, EMBEDDING_DIM, MIN_SAMPLES, WINDOW_SAMPLES, WINDOW_STEP,
};
pub use inference::{InferenceEngine, ModelContext, ModelLoader};
