//! Top-level verification orchestration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use voicelock_auth::{verify_embedding, SessionManager, VerificationResult};
use voicelock_store::{KVStore, ProfileStore};
use voicelock_voiceprint::{EmbeddingExtractor, ModelContext, ModelLoader};

use crate::enroll::Enrollment;
use crate::error::EngineError;
use crate::recorder::ProcessedClip;

/// Owns the long-lived pieces of the pipeline: the memoized model
/// context, the profile store, and the session manager, all over one KV
/// backend.
///
/// Verification is serialized by an atomic flag rather than a queue: a
/// `verify_clip` call that arrives while another is in flight returns
/// `Ok(None)` and is simply dropped.
pub struct VoiceAuthEngine {
    model: ModelContext,
    profiles: ProfileStore,
    sessions: SessionManager,
    verifying: AtomicBool,
}

impl VoiceAuthEngine {
    /// Builds an engine over one KV backend and a model loader.
    pub fn new(loader: Box<dyn ModelLoader>, kv: Arc<dyn KVStore>) -> Self {
        Self::with_parts(
            ModelContext::new(loader),
            ProfileStore::new(kv.clone()),
            SessionManager::new(kv),
        )
    }

    /// Builds an engine from already-constructed parts. Used by tests to
    /// inject a manual clock through the session manager.
    pub fn with_parts(
        model: ModelContext,
        profiles: ProfileStore,
        sessions: SessionManager,
    ) -> Self {
        Self {
            model,
            profiles,
            sessions,
            verifying: AtomicBool::new(false),
        }
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn model(&self) -> &ModelContext {
        &self.model
    }

    /// An extractor borrowing this engine's model context.
    pub fn extractor(&self) -> EmbeddingExtractor<'_> {
        EmbeddingExtractor::new(&self.model)
    }

    /// Embeds a clip into an in-progress enrollment.
    pub async fn add_enrollment_clip(
        &self,
        enrollment: &mut Enrollment,
        clip: &ProcessedClip,
    ) -> Result<usize, EngineError> {
        enrollment.add_clip(&self.extractor(), clip).await
    }

    /// Persists a full enrollment as a named profile.
    pub fn complete_enrollment(
        &self,
        enrollment: &mut Enrollment,
        name: &str,
    ) -> Result<voicelock_store::Profile, EngineError> {
        enrollment.complete(name, &self.profiles)
    }

    /// Runs one verification attempt over a conditioned clip.
    ///
    /// Returns `Ok(None)` when another attempt is already in flight.
    /// With no profiles enrolled the attempt resolves before any
    /// embedding work. On an accepting risk tier a 24-hour session is
    /// opened for the matched profile as part of the same call.
    pub async fn verify_clip(
        &self,
        clip: &ProcessedClip,
    ) -> Result<Option<VerificationResult>, EngineError> {
        if !clip.report.is_valid() {
            return Err(EngineError::QualityRejected(clip.report.messages()));
        }

        if self.verifying.swap(true, Ordering::SeqCst) {
            tracing::debug!("verification already in flight, attempt dropped");
            return Ok(None);
        }
        let _guard = ClearOnDrop(&self.verifying);

        let enrolled = self.profiles.get_all()?;
        if enrolled.is_empty() {
            return Ok(Some(VerificationResult::no_profiles()));
        }

        let live = self.extractor().extract(&clip.samples).await;
        let result = verify_embedding(&live, &enrolled);

        if result.risk.accepts() {
            if let Some(id) = &result.profile_id {
                if let Some(profile) = self.profiles.get(id)? {
                    self.sessions
                        .authenticate(&profile.name, result.score, result.risk)?;
                }
            }
        }

        Ok(Some(result))
    }
}

/// Resets the in-flight flag when the attempt ends, on any path.
struct ClearOnDrop<'a>(&'a AtomicBool);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
