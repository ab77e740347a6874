use std::fmt;

use serde::{Deserialize, Serialize};

/// Confidence attached to every crossover recommendation. No calibration
/// exists, so it is always full confidence.
pub const FULL_CONFIDENCE: f64 = 1.0;

/// Output of the signal engine: buy (`true`) or sell (`false`) the base
/// currency of the pair, with a confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub buy: bool,
    pub confidence: f64,
}

impl Recommendation {
    pub fn buy() -> Self {
        Self {
            buy: true,
            confidence: FULL_CONFIDENCE,
        }
    }

    pub fn sell() -> Self {
        Self {
            buy: false,
            confidence: FULL_CONFIDENCE,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = if self.buy { "BUY" } else { "SELL" };
        write!(f, "{side} (confidence {:.2})", self.confidence)
    }
}
