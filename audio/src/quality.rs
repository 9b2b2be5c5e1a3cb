//! Quality gating for captured clips.
//!
//! The gate runs after resampling and trimming and accumulates every
//! applicable violation instead of failing fast, so the user can fix
//! duration and clipping problems in a single retry.

use std::fmt;

/// Duration below which a clip is rejected outright.
pub const MIN_DURATION_SECS: f64 = 1.0;

/// Duration an enrollment or verification clip must reach.
pub const REQUIRED_DURATION_SECS: f64 = 4.0;

/// Absolute amplitude at or above which a sample counts as clipped.
pub const CLIP_THRESHOLD: f32 = 0.99;

/// A single user-facing quality violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityIssue {
    /// Clip is shorter than [`MIN_DURATION_SECS`].
    TooShort,
    /// Clip is shorter than [`REQUIRED_DURATION_SECS`].
    /// Co-occurs with [`QualityIssue::TooShort`] for very short clips.
    BelowRequiredDuration,
    /// At least one sample reached [`CLIP_THRESHOLD`].
    Clipping,
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(f, "Recording is too short (< 1s)."),
            Self::BelowRequiredDuration => {
                write!(f, "Duration must be at least 4 seconds.")
            }
            Self::Clipping => {
                write!(f, "Audio is clipping (too loud). Move further from microphone.")
            }
        }
    }
}

/// Outcome of the quality gate for one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    /// Clip duration in seconds.
    pub duration_secs: f64,
    /// True when any sample reached the clipping threshold.
    pub has_clipping: bool,
    /// Every violation found, in check order.
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    /// True when no violations were found.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// User-facing message strings, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.to_string()).collect()
    }
}

/// Validates a trimmed clip at the given rate.
///
/// Pure function, no side effects. Violations are aggregated; the caller
/// decides whether to retry.
pub fn check_quality(samples: &[f32], sample_rate: u32) -> QualityReport {
    let duration_secs = if sample_rate == 0 {
        0.0
    } else {
        samples.len() as f64 / sample_rate as f64
    };

    let mut issues = Vec::new();
    if duration_secs < MIN_DURATION_SECS {
        issues.push(QualityIssue::TooShort);
    }
    if duration_secs < REQUIRED_DURATION_SECS {
        issues.push(QualityIssue::BelowRequiredDuration);
    }

    let has_clipping = samples.iter().any(|s| s.abs() >= CLIP_THRESHOLD);
    if has_clipping {
        issues.push(QualityIssue::Clipping);
    }

    QualityReport {
        duration_secs,
        has_clipping,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SAMPLE_RATE;

    fn secs(n: f64) -> Vec<f32> {
        vec![0.1; (SAMPLE_RATE as f64 * n) as usize]
    }

    #[test]
    fn half_second_clip_reports_both_duration_issues() {
        let report = check_quality(&secs(0.5), SAMPLE_RATE);
        assert!(!report.is_valid());
        assert_eq!(
            report.issues,
            vec![QualityIssue::TooShort, QualityIssue::BelowRequiredDuration]
        );
        assert!(!report.has_clipping);
    }

    #[test]
    fn clean_five_second_clip_passes() {
        let report = check_quality(&secs(5.0), SAMPLE_RATE);
        assert!(report.is_valid());
        assert!(report.issues.is_empty());
        assert!(!report.has_clipping);
        assert!((report.duration_secs - 5.0).abs() < 1e-9);
    }

    #[test]
    fn two_second_clip_only_below_required() {
        let report = check_quality(&secs(2.0), SAMPLE_RATE);
        assert_eq!(report.issues, vec![QualityIssue::BelowRequiredDuration]);
    }

    #[test]
    fn clipped_sample_flags_clipping() {
        let mut samples = secs(5.0);
        samples[1000] = 0.995;
        let report = check_quality(&samples, SAMPLE_RATE);
        assert!(report.has_clipping);
        assert_eq!(report.issues, vec![QualityIssue::Clipping]);
    }

    #[test]
    fn negative_clipping_counts() {
        let mut samples = secs(5.0);
        samples[0] = -1.0;
        let report = check_quality(&samples, SAMPLE_RATE);
        assert!(report.has_clipping);
    }

    #[test]
    fn clip_threshold_is_inclusive() {
        let mut samples = secs(5.0);
        samples[0] = 0.99;
        assert!(check_quality(&samples, SAMPLE_RATE).has_clipping);

        let mut samples = secs(5.0);
        samples[0] = 0.989;
        assert!(!check_quality(&samples, SAMPLE_RATE).has_clipping);
    }

    #[test]
    fn short_and_clipped_accumulates_all_three() {
        let mut samples = secs(0.5);
        samples[0] = 1.0;
        let report = check_quality(&samples, SAMPLE_RATE);
        assert_eq!(report.issues.len(), 3);
    }

    #[test]
    fn messages_are_user_facing() {
        let report = check_quality(&secs(0.5), SAMPLE_RATE);
        let messages = report.messages();
        assert_eq!(messages[0], "Recording is too short (< 1s).");
        assert_eq!(messages[1], "Duration must be at least 4 seconds.");
    }
}
