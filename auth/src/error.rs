use thiserror::Error;

use voicelock_store::StoreError;

/// Errors returned by session operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A High-risk verification can never open a session.
    #[error("auth: risk too high for a session")]
    RiskTooHigh,

    #[error(transparent)]
    Store(#[from] StoreError),
}
