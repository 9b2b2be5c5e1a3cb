//! Press-to-record state machine.
//!
//! One recorder, one clip at a time. A press opens the capture stream,
//! a release closes it and conditions the clip (resample, trim, quality
//! gate). Presses and releases that arrive in the wrong state are
//! ignored rather than queued; a new press from `Ready` or `Failed`
//! discards the previous outcome.

use std::sync::Arc;

use voicelock_audio::{
    check_quality, peak, resample, rms, trim_silence, QualityReport, SampleBuffer,
    SAMPLE_RATE, TRIM_THRESHOLD,
};

use crate::capture::CaptureDevice;
use crate::error::EngineError;

/// A clip that made it through conditioning, plus its quality verdict.
///
/// Samples are 16 kHz mono with surrounding silence removed. The report
/// may still carry violations; callers that need a valid clip check
/// [`QualityReport::is_valid`] before consuming it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedClip {
    pub samples: Vec<f32>,
    pub report: QualityReport,
}

/// Where the recorder is in its capture cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum RecorderState {
    /// No capture in progress, no pending clip.
    Idle,
    /// The stream is open and buffering.
    Recording,
    /// The stream closed; the clip is being conditioned.
    Processing,
    /// A conditioned clip is waiting to be taken.
    Ready(ProcessedClip),
    /// Capture or conditioning failed. A new press retries.
    Failed(String),
}

impl RecorderState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Processing => "processing",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

/// Drives one [`CaptureDevice`] through press/release cycles.
pub struct Recorder {
    device: Arc<dyn CaptureDevice>,
    state: RecorderState,
}

impl Recorder {
    pub fn new(device: Arc<dyn CaptureDevice>) -> Self {
        Self {
            device,
            state: RecorderState::Idle,
        }
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    /// Starts a capture. Valid from `Idle`, `Ready`, and `Failed`;
    /// returns `false` (without side effects) from any other state.
    pub async fn press(&mut self) -> Result<bool, EngineError> {
        match self.state {
            RecorderState::Idle | RecorderState::Ready(_) | RecorderState::Failed(_) => {}
            _ => {
                tracing::debug!(state = self.state.name(), "press ignored");
                return Ok(false);
            }
        }

        if let Err(e) = self.device.start().await {
            self.state = RecorderState::Failed(e.to_string());
            return Err(e.into());
        }
        self.state = RecorderState::Recording;
        Ok(true)
    }

    /// Stops the capture and conditions the clip. Valid only from
    /// `Recording`; returns `false` from any other state. On success the
    /// recorder is `Ready` even when the quality gate found violations;
    /// the report says which.
    pub async fn release(&mut self) -> Result<bool, EngineError> {
        if self.state != RecorderState::Recording {
            tracing::debug!(state = self.state.name(), "release ignored");
            return Ok(false);
        }
        self.state = RecorderState::Processing;

        let buffer = match self.device.stop().await {
            Ok(buffer) => buffer,
            Err(e) => {
                self.state = RecorderState::Failed(e.to_string());
                return Err(e.into());
            }
        };

        match condition_clip(&buffer) {
            Ok(clip) => {
                tracing::debug!(
                    duration_secs = clip.report.duration_secs,
                    valid = clip.report.is_valid(),
                    "clip conditioned"
                );
                self.state = RecorderState::Ready(clip);
                Ok(true)
            }
            Err(e) => {
                self.state = RecorderState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Takes the pending clip, returning the recorder to `Idle`.
    /// `None` when no clip is ready.
    pub fn take_clip(&mut self) -> Option<ProcessedClip> {
        if matches!(self.state, RecorderState::Ready(_)) {
            let state = std::mem::replace(&mut self.state, RecorderState::Idle);
            match state {
                RecorderState::Ready(clip) => Some(clip),
                _ => unreachable!(),
            }
        } else {
            None
        }
    }
}

/// Conditions a raw capture: resample to 16 kHz, trim surrounding
/// silence, run the quality gate. Pure apart from the allocation.
pub fn condition_clip(buffer: &SampleBuffer) -> Result<ProcessedClip, EngineError> {
    let resampled = resample(buffer.samples(), buffer.sample_rate(), SAMPLE_RATE)?;
    let trimmed = trim_silence(&resampled, TRIM_THRESHOLD);
    let report = check_quality(trimmed, SAMPLE_RATE);
    tracing::debug!(rms = rms(trimmed), peak = peak(trimmed), "clip level");
    Ok(ProcessedClip {
        samples: trimmed.to_vec(),
        report,
    })
}
