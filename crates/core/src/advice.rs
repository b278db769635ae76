//! Threshold rule that turns a refund rate into advisory text.

use crate::types::Recommendation;

/// Refund rates strictly above this fraction are flagged.
pub const DEFAULT_REFUND_RATE_THRESHOLD: f64 = 0.15;

/// Advice shown when the refund rate is above the threshold.
pub const HIGH_REFUND_ADVICE: &str =
    "The refund rate is high; consider improving offer descriptions and the service flow.";

/// Advice shown otherwise.
pub const NORMAL_REFUND_ADVICE: &str = "The refund rate is within the normal range.";

/// Maps a refund rate to one of two fixed recommendations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationRule {
    threshold: f64,
}

impl Default for RecommendationRule {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_REFUND_RATE_THRESHOLD,
        }
    }
}

impl RecommendationRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different threshold (as a fraction, 0.15 = 15%).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn recommend(&self, refund_rate: f64) -> Recommendation {
        let high_refund_rate = refund_rate > self.threshold;
        let text = if high_refund_rate {
            HIGH_REFUND_ADVICE
        } else {
            NORMAL_REFUND_ADVICE
        };
        Recommendation {
            high_refund_rate,
            text: text.to_string(),
        }
    }
}
