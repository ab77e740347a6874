use std::time::Duration;

use crate::error::EngineError;

/// What wakes the evaluation loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickSource {
    /// Evaluate on a fixed cadence, using whatever samples are queued.
    Interval(Duration),
    /// Evaluate whenever at least one new sample has arrived.
    FeedArrival,
}

impl Default for TickSource {
    fn default() -> Self {
        Self::Interval(Duration::from_secs(1))
    }
}

/// Settings for one signal engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fast-reacting window length (samples).
    pub short_window: usize,

    /// Slow-reacting window length (samples).
    pub long_window: usize,

    pub tick: TickSource,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 20,
            tick: TickSource::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        for capacity in [self.short_window, self.long_window] {
            if capacity == 0 {
                return Err(EngineError::InvalidWindow { capacity });
            }
        }

        if self.short_window >= self.long_window {
            return Err(EngineError::WindowOrder {
                short: self.short_window,
                long: self.long_window,
            });
        }

        if self.tick == TickSource::Interval(Duration::ZERO) {
            return Err(EngineError::ZeroTickInterval);
        }

        Ok(())
    }
}
