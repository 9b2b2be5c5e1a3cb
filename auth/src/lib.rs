//! Verification and session lifecycle.
//!
//! A live [`voicelock_voiceprint::Embedding`] is matched against every
//! enrolled profile ([`verify_embedding`]), the best similarity is mapped
//! to a [`RiskLevel`], and on an accepting tier the [`SessionManager`]
//! records a 24-hour authenticated session with lazy expiry.

mod error;
mod risk;
mod session;
mod verify;

pub use error::AuthError;
pub use risk::{classify, RiskLevel, THRESHOLD_LOW, THRESHOLD_MEDIUM};
pub use session::{AuthSession, Clock, SessionManager, SystemClock, SESSION_TTL_MS};
pub use verify::{verify_embedding, VerificationResult};
