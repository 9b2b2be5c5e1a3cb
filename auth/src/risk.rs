use std::fmt;

use serde::{Deserialize, Serialize};

/// Similarity above which a match is high confidence.
pub const THRESHOLD_LOW: f32 = 0.65;

/// Similarity above which a match is moderate confidence.
pub const THRESHOLD_MEDIUM: f32 = 0.45;

/// Risk tier of a verification attempt.
///
/// Low and Medium accept (Medium suggests additional verification);
/// High denies. Consumers match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH")]
    High,
}

impl RiskLevel {
    /// True when this tier permits a session.
    pub fn accepts(&self) -> bool {
        matches!(self, RiskLevel::Low | RiskLevel::Medium)
    }

    /// Tier-specific explanatory detail.
    pub fn detail(&self) -> &'static str {
        match self {
            RiskLevel::Low => "High confidence match.",
            RiskLevel::Medium => "Moderate confidence. Consider additional verification.",
            RiskLevel::High => "Low similarity score. Access denied.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps a best similarity score to its risk tier.
///
/// Boundaries are strict: exactly 0.65 is Medium, exactly 0.45 is High.
pub fn classify(score: f32) -> RiskLevel {
    if score > THRESHOLD_LOW {
        RiskLevel::Low
    } else if score > THRESHOLD_MEDIUM {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
