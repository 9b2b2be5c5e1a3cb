use thiserror::Error;

/// Errors returned by audio conditioning operations.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("invalid sample rate: {0} Hz")]
    InvalidRate(u32),

    #[error("resample error: {0}")]
    Resample(String),
}
