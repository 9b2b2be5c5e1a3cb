//! Audio conditioning for the voice pipeline.
//!
//! Raw capture yields a [`SampleBuffer`] at whatever rate the device
//! produced. Before any biometric work the buffer passes through three
//! stages, in order:
//!
//! 1. [`resample`]: convert to the canonical 16 kHz rate
//! 2. [`trim_silence`]: drop leading/trailing near-silence
//! 3. [`check_quality`]: accumulate duration and clipping violations
//!
//! All stages are pure functions over f32 sample slices; none of them
//! mutates interior samples.

mod buffer;
mod error;
mod level;
mod quality;
mod resample;
mod trim;

pub use buffer::SampleBuffer;
pub use error::AudioError;
pub use level::{peak, rms};
pub use quality::{check_quality, QualityIssue, QualityReport};
pub use resample::resample;
pub use trim::trim_silence;

/// Canonical sample rate the pipeline operates at.
pub const SAMPLE_RATE: u32 = 16_000;

/// Amplitude below which a sample counts as silence for trimming.
pub const TRIM_THRESHOLD: f32 = 0.02;
