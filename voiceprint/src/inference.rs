//! Inference collaborator traits and the memoized model context.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::VoiceprintError;

/// Runs the speaker embedding model on one audio window.
///
/// Contract with the external tensor-evaluation service: one named input
/// tensor `waveform` of shape `[1, N]` f32, one named output tensor
/// `embeddings` of shape `[1, 512]` f32.
///
/// Implementations must be safe for concurrent use (Send + Sync).
#[async_trait::async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Returns the embedding vector for a single window of samples.
    async fn run(&self, waveform: &[f32]) -> Result<Vec<f32>, VoiceprintError>;
}

/// Produces a ready [`InferenceEngine`], typically by loading model
/// weights from disk or an embedded resource.
#[async_trait::async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn InferenceEngine>, VoiceprintError>;
}

/// Owns the loaded inference handle and its pending-load state.
///
/// The context is created by the application and passed by reference into
/// the extractor; there is no process-wide singleton. Loading is
/// idempotent: the first call to [`ModelContext::engine`] triggers the
/// load, concurrent callers await the same in-flight load, and the
/// outcome (engine or definitive failure) is memoized.
pub struct ModelContext {
    loader: Box<dyn ModelLoader>,
    engine: OnceCell<Option<Arc<dyn InferenceEngine>>>,
}

impl ModelContext {
    /// Creates a context around a loader. Nothing is loaded yet.
    pub fn new(loader: Box<dyn ModelLoader>) -> Self {
        Self {
            loader,
            engine: OnceCell::new(),
        }
    }

    /// Returns the engine, loading it on first use.
    ///
    /// `None` means the load failed definitively; callers should use the
    /// spectral fallback. The failure is logged once, here.
    pub async fn engine(&self) -> Option<Arc<dyn InferenceEngine>> {
        self.engine
            .get_or_init(|| async {
                match self.loader.load().await {
                    Ok(engine) => Some(engine),
                    Err(e) => {
                        tracing::warn!(error = %e, "model load failed, spectral fallback in effect");
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// True once a load attempt has completed, in either direction.
    pub fn load_attempted(&self) -> bool {
        self.engine.initialized()
    }
}
