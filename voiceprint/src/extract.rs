//! Windowed embedding extraction.

use voicelock_audio::SAMPLE_RATE;

use crate::embedding::{l2_normalize, Embedding, EmbeddingSource};
use crate::inference::{InferenceEngine, ModelContext};
use crate::spectral::spectral_fingerprint;
use crate::VoiceprintError;

/// Dimensionality of every embedding, both paths.
pub const EMBEDDING_DIM: usize = 512;

/// Shortest clip the model accepts; shorter input is zero-padded (2 s).
pub const MIN_SAMPLES: usize = 2 * SAMPLE_RATE as usize;

/// Inference window length (3 s).
pub const WINDOW_SAMPLES: usize = 3 * SAMPLE_RATE as usize;

/// Stride between windows, 50% overlap (1.5 s).
pub const WINDOW_STEP: usize = WINDOW_SAMPLES / 2;

/// Turns a conditioned clip into a fixed-dimension [`Embedding`].
///
/// The extractor never fails: when the neural path is unavailable or an
/// inference call errors, the attempt degrades to the spectral
/// fingerprint. The degradation is logged at `warn` because it weakens
/// biometric assurance.
pub struct EmbeddingExtractor<'a> {
    ctx: &'a ModelContext,
}

impl<'a> EmbeddingExtractor<'a> {
    /// Creates an extractor over an application-owned model context.
    pub fn new(ctx: &'a ModelContext) -> Self {
        Self { ctx }
    }

    /// Extracts an embedding from 16 kHz mono samples.
    ///
    /// Windows of [`WINDOW_SAMPLES`] slide at [`WINDOW_STEP`] across the
    /// (zero-padded) clip, one inference call each; the window vectors
    /// are averaged element-wise and L2-normalized. Windows run
    /// sequentially; averaging is order-independent.
    pub async fn extract(&self, samples: &[f32]) -> Embedding {
        if let Some(engine) = self.ctx.engine().await {
            match extract_windows(engine.as_ref(), samples).await {
                Ok(vector) => return Embedding::new(vector, EmbeddingSource::Neural),
                Err(e) => {
                    tracing::warn!(error = %e, "inference failed, using spectral fallback for this attempt");
                }
            }
        }
        Embedding::new(spectral_fingerprint(samples), EmbeddingSource::Spectral)
    }
}

async fn extract_windows(
    engine: &dyn InferenceEngine,
    samples: &[f32],
) -> Result<Vec<f32>, VoiceprintError> {
    let padded;
    let samples = if samples.len() < MIN_SAMPLES {
        padded = zero_pad(samples, MIN_SAMPLES);
        &padded[..]
    } else {
        samples
    };

    let mut vectors: Vec<Vec<f32>> = Vec::new();
    if samples.len() >= WINDOW_SAMPLES {
        let mut start = 0;
        while start + WINDOW_SAMPLES <= samples.len() {
            let window = &samples[start..start + WINDOW_SAMPLES];
            vectors.push(run_window(engine, window).await?);
            start += WINDOW_STEP;
        }
    } else {
        let window = zero_pad(samples, WINDOW_SAMPLES);
        vectors.push(run_window(engine, &window).await?);
    }

    let mut avg = vec![0.0f32; EMBEDDING_DIM];
    for vector in &vectors {
        for (slot, &v) in avg.iter_mut().zip(vector.iter()) {
            *slot += v;
        }
    }
    let n = vectors.len() as f32;
    for slot in &mut avg {
        *slot /= n;
    }

    l2_normalize(&mut avg);
    Ok(avg)
}

async fn run_window(
    engine: &dyn InferenceEngine,
    window: &[f32],
) -> Result<Vec<f32>, VoiceprintError> {
    let vector = engine.run(window).await?;
    if vector.len() != EMBEDDING_DIM {
        return Err(VoiceprintError::DimensionMismatch {
            expected: EMBEDDING_DIM,
            got: vector.len(),
        });
    }
    Ok(vector)
}

fn zero_pad(samples: &[f32], len: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; len];
    out[..samples.len()].copy_from_slice(samples);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ModelLoader;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Engine whose output depends on the window content, so the window
    /// schedule is observable through the average.
    struct ProbeEngine {
        calls: Arc<AtomicUsize>,
        fail: bool,
        bad_dim: bool,
    }

    #[async_trait::async_trait]
    impl InferenceEngine for ProbeEngine {
        async fn run(&self, waveform: &[f32]) -> Result<Vec<f32>, VoiceprintError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(VoiceprintError::Inference("backend gone".into()));
            }
            if self.bad_dim {
                return Ok(vec![1.0; 7]);
            }
            let mut vector = vec![0.0f32; EMBEDDING_DIM];
            vector[0] = waveform.iter().sum::<f32>();
            vector[1] = waveform.len() as f32;
            Ok(vector)
        }
    }

    struct ProbeLoader {
        engine: Arc<ProbeEngine>,
    }

    #[async_trait::async_trait]
    impl ModelLoader for ProbeLoader {
        async fn load(&self) -> Result<Arc<dyn InferenceEngine>, VoiceprintError> {
            Ok(self.engine.clone())
        }
    }

    struct FailingLoader;

    #[async_trait::async_trait]
    impl ModelLoader for FailingLoader {
        async fn load(&self) -> Result<Arc<dyn InferenceEngine>, VoiceprintError> {
            Err(VoiceprintError::ModelLoad("no weights".into()))
        }
    }

    fn probe_ctx(fail: bool, bad_dim: bool) -> (ModelContext, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = Arc::new(ProbeEngine {
            calls: calls.clone(),
            fail,
            bad_dim,
        });
        (ModelContext::new(Box::new(ProbeLoader { engine })), calls)
    }

    #[tokio::test]
    async fn short_clip_runs_single_padded_window() {
        let (ctx, calls) = probe_ctx(false, false);
        let extractor = EmbeddingExtractor::new(&ctx);

        // 2.5 s: above MIN_SAMPLES, below WINDOW_SAMPLES.
        let clip = vec![0.25f32; 40_000];
        let emb = extractor.extract(&clip).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(emb.source(), EmbeddingSource::Neural);
        assert_eq!(emb.dim(), EMBEDDING_DIM);
        assert!((emb.norm() - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn sub_minimum_clip_padded_to_min_then_window() {
        let (ctx, calls) = probe_ctx(false, false);
        let extractor = EmbeddingExtractor::new(&ctx);

        let clip = vec![0.5f32; 8_000];
        let emb = extractor.extract(&clip).await;

        // Padded to MIN_SAMPLES (still below a window) then to one window.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(emb.source(), EmbeddingSource::Neural);
    }

    #[tokio::test]
    async fn long_clip_slides_overlapping_windows() {
        let (ctx, calls) = probe_ctx(false, false);
        let extractor = EmbeddingExtractor::new(&ctx);

        // 6 s = 96000 samples: windows at 0, 24000, 48000 (72000 + 48000
        // would exceed the buffer).
        let clip = vec![0.1f32; 6 * SAMPLE_RATE as usize];
        let emb = extractor.extract(&clip).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(emb.source(), EmbeddingSource::Neural);
        assert!((emb.norm() - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn exact_window_runs_once() {
        let (ctx, calls) = probe_ctx(false, false);
        let extractor = EmbeddingExtractor::new(&ctx);

        let clip = vec![0.1f32; WINDOW_SAMPLES];
        extractor.extract(&clip).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn inference_failure_falls_back_to_spectral() {
        let (ctx, calls) = probe_ctx(true, false);
        let extractor = EmbeddingExtractor::new(&ctx);

        let clip: Vec<f32> = (0..WINDOW_SAMPLES).map(|i| ((i % 100) as f32 - 50.0) / 60.0).collect();
        let emb = extractor.extract(&clip).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(emb.source(), EmbeddingSource::Spectral);
        assert_eq!(emb.values(), spectral_fingerprint(&clip).as_slice());
    }

    #[tokio::test]
    async fn bad_output_dimension_falls_back() {
        let (ctx, _calls) = probe_ctx(false, true);
        let extractor = EmbeddingExtractor::new(&ctx);

        let emb = extractor.extract(&vec![0.3f32; WINDOW_SAMPLES]).await;
        assert_eq!(emb.source(), EmbeddingSource::Spectral);
        assert_eq!(emb.dim(), EMBEDDING_DIM);
    }

    #[tokio::test]
    async fn absent_model_always_spectral() {
        let ctx = ModelContext::new(Box::new(FailingLoader));
        let extractor = EmbeddingExtractor::new(&ctx);

        let clip = vec![0.2f32; WINDOW_SAMPLES];
        let emb = extractor.extract(&clip).await;
        assert_eq!(emb.source(), EmbeddingSource::Spectral);
        assert!((emb.norm() - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn all_zero_clip_yields_zero_embedding() {
        let ctx = ModelContext::new(Box::new(FailingLoader));
        let extractor = EmbeddingExtractor::new(&ctx);

        let emb = extractor.extract(&vec![0.0f32; WINDOW_SAMPLES]).await;
        assert_eq!(emb.norm(), 0.0);
        assert!(emb.values().iter().all(|&v| v == 0.0));
    }

    #[tokio::test]
    async fn neural_embedding_is_unit_length() {
        let (ctx, _) = probe_ctx(false, false);
        let extractor = EmbeddingExtractor::new(&ctx);

        let clip: Vec<f32> = (0..96_000).map(|i| ((i * 7 % 83) as f32 - 41.0) / 50.0).collect();
        let emb = extractor.extract(&clip).await;
        assert!((emb.norm() - 1.0).abs() < 1e-4);
    }
}
