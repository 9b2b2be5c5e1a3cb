//! Pipeline orchestration for voice authentication.
//!
//! Ties the leaf crates together:
//!
//! 1. A [`CaptureDevice`] collaborator yields a raw clip on release
//! 2. The [`Recorder`] state machine conditions it (resample to 16 kHz,
//!    trim silence, quality gate)
//! 3. [`Enrollment`] collects three valid clips into a stored profile
//! 4. [`VoiceAuthEngine::verify_clip`] extracts a live embedding, matches
//!    it against all profiles, classifies risk, and opens a session on an
//!    accepting tier
//!
//! At most one verification is in flight at a time; attempts made while
//! one is pending are ignored, not queued.

mod capture;
mod engine;
mod enroll;
mod error;
mod recorder;


pub use capture::{CaptureDevice, CaptureError};
pub use engine::VoiceAuthEngine;
pub use enroll::{Enrollment, SAMPLES_REQUIRED};
pub use error::EngineError;
pub use recorder::{condition_clip, ProcessedClip, Recorder, RecorderState};
