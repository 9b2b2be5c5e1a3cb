//! Ephemeral authenticated-session state machine.
//!
//! One session record at a time, stored as JSON in the KV collaborator.
//! States: Unauthenticated -> Authenticated -> Unauthenticated, leaving
//! either by explicit logout or by expiry observed lazily on the next
//! read. There is no renewal; a session is single-shot for its window.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use voicelock_store::KVStore;

use crate::{AuthError, RiskLevel};

/// Fixed session lifetime: 24 hours, milliseconds.
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Storage key for the single session record.
const SESSION_KEY: &str = "session:auth";

/// A time-bounded assertion that a named profile was recently verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub profile_name: String,
    /// Creation time, epoch milliseconds.
    pub timestamp: i64,
    pub similarity_score: f32,
    pub risk_level: RiskLevel,
    /// Hard expiry, epoch milliseconds.
    pub expires_at: i64,
}

/// Wall clock abstraction so expiry is testable.
pub trait Clock: Send + Sync {
    /// Current time as epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Owns the session record lifecycle.
pub struct SessionManager {
    kv: Arc<dyn KVStore>,
    clock: Box<dyn Clock>,
}

impl SessionManager {
    /// Creates a manager over the KV collaborator with the system clock.
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self::with_clock(kv, Box::new(SystemClock))
    }

    /// Creates a manager with an explicit clock.
    pub fn with_clock(kv: Arc<dyn KVStore>, clock: Box<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    /// Transitions to Authenticated.
    ///
    /// Only Low or Medium risk may open a session; High is rejected with
    /// [`AuthError::RiskTooHigh`]. The record expires 24 hours from now.
    pub fn authenticate(
        &self,
        profile_name: &str,
        similarity_score: f32,
        risk_level: RiskLevel,
    ) -> Result<AuthSession, AuthError> {
        if !risk_level.accepts() {
            return Err(AuthError::RiskTooHigh);
        }

        let now = self.clock.now_ms();
        let session = AuthSession {
            profile_name: profile_name.to_string(),
            timestamp: now,
            similarity_score,
            risk_level,
            expires_at: now + SESSION_TTL_MS,
        };

        let bytes = serde_json::to_vec(&session)
            .map_err(|e| voicelock_store::StoreError::Serialization(e.to_string()))?;
        self.kv
            .set(SESSION_KEY, &bytes)
            .map_err(voicelock_store::StoreError::from)?;

        tracing::info!(profile = profile_name, risk = %risk_level, "session opened");
        Ok(session)
    }

    /// Reads the current session.
    ///
    /// Expiry is lazy: a record past `expires_at` is deleted here and
    /// reported as absent. A record that fails to parse is treated the
    /// same way.
    pub fn session(&self) -> Result<Option<AuthSession>, AuthError> {
        let bytes = match self.kv.get(SESSION_KEY).map_err(voicelock_store::StoreError::from)? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        let session: AuthSession = match serde_json::from_slice(&bytes) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session record");
                self.kv
                    .delete(SESSION_KEY)
                    .map_err(voicelock_store::StoreError::from)?;
                return Ok(None);
            }
        };

        if self.clock.now_ms() > session.expires_at {
            self.kv
                .delete(SESSION_KEY)
                .map_err(voicelock_store::StoreError::from)?;
            tracing::info!(profile = session.profile_name, "session expired");
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// True when a live, unexpired session exists.
    pub fn is_authenticated(&self) -> Result<bool, AuthError> {
        Ok(self.session()?.is_some())
    }

    /// Transitions to Unauthenticated immediately, regardless of TTL.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.kv
            .delete(SESSION_KEY)
            .map_err(voicelock_store::StoreError::from)?;
        tracing::info!("session closed");
        Ok(())
    }
}
