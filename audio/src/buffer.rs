/// A decoded mono PCM clip as delivered by the capture device.
///
/// Samples are 32-bit floats in `[-1, 1]`. The buffer is produced once
/// and read-only thereafter; pipeline stages return new buffers or
/// sub-slices rather than mutating in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Creates a buffer from raw samples and their wall-clock rate.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// The raw samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// The rate the samples were captured at, in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Clip duration in seconds, derived as `len / rate`.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Consumes the buffer, yielding the sample vector.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
