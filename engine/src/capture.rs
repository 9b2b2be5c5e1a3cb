//! Audio capture collaborator.

use async_trait::async_trait;

use voicelock_audio::SampleBuffer;

/// Failures a capture backend can report.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The platform denied microphone access.
    #[error("microphone permission denied")]
    PermissionDenied,

    /// The backend produced data the device layer could not decode.
    #[error("could not decode captured audio: {0}")]
    Decode(String),
}

/// Source of raw audio, one clip per press/release cycle.
///
/// Implementations own the device session. `start` opens the stream and
/// begins buffering; `stop` closes it and returns everything buffered
/// since `start`, at whatever rate the device runs at. The pipeline
/// resamples afterward, so backends never resample themselves.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Opens the stream and starts buffering.
    async fn start(&self) -> Result<(), CaptureError>;

    /// Closes the stream and returns the buffered clip.
    async fn stop(&self) -> Result<SampleBuffer, CaptureError>;
}
