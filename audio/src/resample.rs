//! Band-limited sample rate conversion via rubato.
//!
//! The pipeline normalizes every capture to [`crate::SAMPLE_RATE`] before
//! feature extraction. Conversion is done with rubato's FFT resampler; the
//! initial filter delay is skipped and the tail flushed so that output
//! sample 0 corresponds to input time 0 and the output length follows the
//! `ceil(len * dst / src)` contract exactly.

use rubato::{FftFixedIn, Resampler as RubatoResampler};

use crate::AudioError;

/// Frames fed to the FFT resampler per processing block.
const CHUNK_FRAMES: usize = 1024;

/// Converts mono f32 samples from `src_rate` to `dst_rate`.
///
/// Equal rates are an identity conversion: the input content is returned
/// unchanged. Otherwise the output holds exactly
/// `ceil(len * dst_rate / src_rate)` samples. Deterministic for a given
/// input.
pub fn resample(input: &[f32], src_rate: u32, dst_rate: u32) -> Result<Vec<f32>, AudioError> {
    if src_rate == 0 {
        return Err(AudioError::InvalidRate(src_rate));
    }
    if dst_rate == 0 {
        return Err(AudioError::InvalidRate(dst_rate));
    }
    if src_rate == dst_rate {
        return Ok(input.to_vec());
    }
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let expected = expected_output_len(input.len(), src_rate, dst_rate);

    let mut resampler = FftFixedIn::<f32>::new(
        src_rate as usize,
        dst_rate as usize,
        CHUNK_FRAMES,
        2,
        1,
    )
    .map_err(|e| AudioError::Resample(e.to_string()))?;

    let delay = resampler.output_delay();
    let mut out: Vec<f32> = Vec::with_capacity(expected + delay);

    // Feed the input in fixed-size blocks; the last short block goes
    // through process_partial.
    let mut pos = 0;
    while pos < input.len() {
        let need = resampler.input_frames_next();
        let end = (pos + need).min(input.len());
        let block = &input[pos..end];
        let frames = if block.len() == need {
            resampler.process(&[block], None)
        } else {
            resampler.process_partial(Some(&[block]), None)
        }
        .map_err(|e| AudioError::Resample(e.to_string()))?;
        out.extend_from_slice(&frames[0]);
        pos = end;
    }

    // Flush until the delayed tail has been emitted.
    while out.len() < delay + expected {
        let frames = resampler
            .process_partial::<&[f32]>(None, None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        if frames[0].is_empty() {
            break;
        }
        out.extend_from_slice(&frames[0]);
    }

    let skip = delay.min(out.len());
    out.drain(..skip);
    out.truncate(expected);
    out.resize(expected, 0.0);
    Ok(out)
}

/// `ceil(len * dst / src)` without intermediate overflow for realistic sizes.
fn expected_output_len(len: usize, src_rate: u32, dst_rate: u32) -> usize {
    let num = len as u64 * dst_rate as u64;
    num.div_ceil(src_rate as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, rate: u32, secs: f32) -> Vec<f32> {
        let n = (rate as f32 * secs) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn identity_when_rates_match() {
        let input = sine(440.0, 16_000, 0.25);
        let out = resample(&input, 16_000, 16_000).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn identity_for_arbitrary_content() {
        let input = vec![0.3, -0.7, 0.99, 0.0, -0.01];
        let out = resample(&input, 44_100, 44_100).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn downsample_length_contract() {
        let input = sine(440.0, 48_000, 1.0);
        let out = resample(&input, 48_000, 16_000).unwrap();
        assert_eq!(out.len(), expected_output_len(input.len(), 48_000, 16_000));
        assert_eq!(out.len(), 16_000);
    }

    #[test]
    fn upsample_length_contract() {
        let input = sine(200.0, 16_000, 0.5);
        let out = resample(&input, 16_000, 48_000).unwrap();
        assert_eq!(out.len(), 24_000);
    }

    #[test]
    fn non_integer_ratio_length() {
        // 44.1 kHz -> 16 kHz: 44100 samples -> ceil(44100 * 16000 / 44100) = 16000.
        let input = sine(300.0, 44_100, 1.0);
        let out = resample(&input, 44_100, 16_000).unwrap();
        assert_eq!(out.len(), 16_000);

        // Odd length forces the ceil to matter.
        let input = vec![0.1f32; 44_101];
        let out = resample(&input, 44_100, 16_000).unwrap();
        assert_eq!(out.len(), expected_output_len(44_101, 44_100, 16_000));
    }

    #[test]
    fn deterministic() {
        let input = sine(440.0, 48_000, 0.5);
        let a = resample(&input, 48_000, 16_000).unwrap();
        let b = resample(&input, 48_000, 16_000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn silence_stays_silent() {
        let input = vec![0.0f32; 48_000];
        let out = resample(&input, 48_000, 16_000).unwrap();
        let peak = out.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak < 1e-3, "resampled silence should stay silent, peak {peak}");
    }

    #[test]
    fn tone_energy_preserved() {
        // A 1 kHz tone is well below both Nyquist limits; RMS should survive.
        let input = sine(1000.0, 48_000, 1.0);
        let out = resample(&input, 48_000, 16_000).unwrap();

        let rms_in: f64 = (input.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>()
            / input.len() as f64)
            .sqrt();
        let rms_out: f64 = (out.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>()
            / out.len() as f64)
            .sqrt();
        assert!(
            (rms_in - rms_out).abs() < 0.05,
            "rms in {rms_in}, rms out {rms_out}"
        );
    }

    #[test]
    fn empty_input() {
        assert!(resample(&[], 48_000, 16_000).unwrap().is_empty());
    }

    #[test]
    fn zero_rate_rejected() {
        assert!(resample(&[0.0], 0, 16_000).is_err());
        assert!(resample(&[0.0], 16_000, 0).is_err());
    }
}
