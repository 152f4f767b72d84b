//! Detector confidence, normalized to `[0.0, 1.0]`.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::errors::{CodewatchError, CodewatchResult};

/// Roundoff tolerance applied at both bounds before range checking.
pub const CONFIDENCE_EPSILON: f64 = 0.00001;

/// A detector's self-reported certainty.
///
/// Values within [`CONFIDENCE_EPSILON`] outside the unit interval are clamped
/// to the nearest bound; anything further out is rejected. NaN is rejected,
/// so the type is totally ordered and can implement `Eq` and `Hash`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    pub const HIGH: ConfidenceScore = ConfidenceScore(0.9);
    pub const MEDIUM: ConfidenceScore = ConfidenceScore(0.5);
    pub const LOW: ConfidenceScore = ConfidenceScore(0.3);

    pub fn new(value: f64) -> CodewatchResult<Self> {
        let normalized = if (-CONFIDENCE_EPSILON..0.0).contains(&value) {
            0.0
        } else if value > 1.0 && value <= 1.0 + CONFIDENCE_EPSILON {
            1.0
        } else {
            value
        };

        if !(0.0..=1.0).contains(&normalized) {
            return Err(CodewatchError::InvalidConfidenceScore(format!(
                "Confidence score must be between 0.0 and 1.0, got {value}"
            )));
        }

        // Fold -0.0 into 0.0 so equal scores hash identically.
        Ok(Self(if normalized == 0.0 { 0.0 } else { normalized }))
    }

    pub const fn high() -> Self {
        Self::HIGH
    }

    pub const fn medium() -> Self {
        Self::MEDIUM
    }

    pub const fn low() -> Self {
        Self::LOW
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Eq for ConfidenceScore {}

impl Hash for ConfidenceScore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl TryFrom<f64> for ConfidenceScore {
    type Error = CodewatchError;

    fn try_from(value: f64) -> CodewatchResult<Self> {
        Self::new(value)
    }
}

impl From<ConfidenceScore> for f64 {
    fn from(score: ConfidenceScore) -> f64 {
        score.0
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.0)
    }
}
