use serde::{Deserialize, Serialize};

/// A single price observation delivered by a feed.
///
/// Feeds deliver samples in non-decreasing `timestamp` order. Consumers
/// rely on that ordering but do not check it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: f64,
    /// Unix seconds.
    pub timestamp: i64,
}

impl PriceSample {
    pub fn new(price: f64, timestamp: i64) -> Self {
        Self { price, timestamp }
    }
}
