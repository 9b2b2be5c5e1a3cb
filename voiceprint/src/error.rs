use thiserror::Error;

/// Errors returned by voiceprint operations.
///
/// Model and inference failures are non-fatal to the pipeline: the
/// extractor logs them and substitutes the spectral fallback.
#[derive(Debug, Error)]
pub enum VoiceprintError {
    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
