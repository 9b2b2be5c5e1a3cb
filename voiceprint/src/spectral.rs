//! Deterministic spectral fingerprint, the guaranteed fallback path.
//!
//! When the inference collaborator is unavailable the pipeline still has
//! to produce an embedding. The fingerprint summarizes the clip with
//! per-segment amplitude and zero-crossing statistics; it is stable for a
//! given input and never fails.

use crate::embedding::l2_normalize;
use crate::extract::EMBEDDING_DIM;

/// Computes a 512-dim fingerprint from raw samples.
///
/// The clip is split into [`EMBEDDING_DIM`] equal contiguous segments;
/// each dimension is `mean_abs_amplitude * (1 + zero_crossings)` for its
/// segment, and the result is L2-normalized. Input shorter than the
/// dimension degrades to one-sample segments with the tail dimensions
/// zero; all-zero input yields the all-zero vector.
pub fn spectral_fingerprint(samples: &[f32]) -> Vec<f32> {
    let mut vec = vec![0.0f32; EMBEDDING_DIM];
    if samples.is_empty() {
        return vec;
    }

    let step = (samples.len() / EMBEDDING_DIM).max(1);

    for (i, slot) in vec.iter_mut().enumerate() {
        let start = i * step;
        if start >= samples.len() {
            break;
        }
        let end = (start + step).min(samples.len());
        let segment = &samples[start..end];

        let mean_abs: f32 =
            segment.iter().map(|s| s.abs()).sum::<f32>() / segment.len() as f32;

        let mut crossings = 0u32;
        for j in 1..segment.len() {
            let prev_neg = segment[j - 1] < 0.0;
            let cur_neg = segment[j] < 0.0;
            if prev_neg != cur_neg {
                crossings += 1;
            }
        }

        *slot = mean_abs * (1.0 + crossings as f32);
    }

    l2_normalize(&mut vec);
    vec
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(vec: &[f32]) -> f64 {
        vec.iter().map(|&v| (v as f64) * (v as f64)).sum::<f64>().sqrt()
    }

    #[test]
    fn fingerprint_is_unit_length() {
        let samples: Vec<f32> = (0..32_000)
            .map(|i| (i as f32 * 0.01).sin() * 0.4)
            .collect();
        let vec = spectral_fingerprint(&samples);
        assert_eq!(vec.len(), EMBEDDING_DIM);
        assert!((norm(&vec) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let samples: Vec<f32> = (0..16_000).map(|i| ((i % 37) as f32 - 18.0) / 20.0).collect();
        assert_eq!(spectral_fingerprint(&samples), spectral_fingerprint(&samples));
    }

    #[test]
    fn all_zero_input_yields_zero_vector() {
        let vec = spectral_fingerprint(&vec![0.0; 32_000]);
        assert!(vec.iter().all(|&v| v == 0.0));
        assert_eq!(norm(&vec), 0.0);
    }

    #[test]
    fn empty_input_yields_zero_vector() {
        let vec = spectral_fingerprint(&[]);
        assert_eq!(vec.len(), EMBEDDING_DIM);
        assert!(vec.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn input_shorter_than_dim_never_panics() {
        // 10 samples into 512 segments: one sample each, tail zero.
        let vec = spectral_fingerprint(&[0.5, -0.5, 0.5, -0.5, 0.5, -0.5, 0.5, -0.5, 0.5, -0.5]);
        assert_eq!(vec.len(), EMBEDDING_DIM);
        assert!((norm(&vec) - 1.0).abs() < 1e-4);
        assert!(vec[10..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn different_signals_differ() {
        let quiet: Vec<f32> = vec![0.05; 32_000];
        let buzzy: Vec<f32> = (0..32_000).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        assert_ne!(spectral_fingerprint(&quiet), spectral_fingerprint(&buzzy));
    }
}
