use crate::capture::CaptureError;

/// Errors surfaced by the orchestration layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Audio(#[from] voicelock_audio::AudioError),

    /// The conditioned clip failed the quality gate. Carries the
    /// user-facing message for each violation.
    #[error("clip rejected: {}", .0.join(" "))]
    QualityRejected(Vec<String>),

    /// Fewer than the required number of clips have been collected.
    #[error("enrollment needs {required} samples, has {collected}")]
    EnrollmentIncomplete { collected: usize, required: usize },

    #[error("profile name must not be empty")]
    EmptyName,

    #[error(transparent)]
    Store(#[from] voicelock_store::StoreError),

    #[error(transparent)]
    Auth(#[from] voicelock_auth::AuthError),
}
