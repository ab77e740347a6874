//! Short/long moving-average crossover.
//!
//! The detector keeps two [`RollingWindow`]s fed with the same prices. When
//! the short (fast) average rises above the long (slow) one it recommends a
//! buy; when it falls below, a sell. A single state bit provides
//! hysteresis: after a buy, further positive spreads are ignored until a
//! sell has fired, and vice versa.

use corelib::{PriceSample, Recommendation};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::rolling_window::RollingWindow;

/// Which crossover direction may fire next.
///
/// Mirrors the historical `waiting_to_sell` flag: while it is set
/// (`WaitingToSell`, the initial state) an upward crossover emits a buy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrossoverState {
    #[default]
    WaitingToSell,
    WaitingToBuy,
}

impl CrossoverState {
    pub fn waiting_to_sell(self) -> bool {
        matches!(self, Self::WaitingToSell)
    }
}

/// Transition rule for one evaluation.
///
/// `diff` is `short_avg - long_avg`. A zero diff never fires.
pub fn decide(diff: f64, state: CrossoverState) -> (Option<Recommendation>, CrossoverState) {
    match state {
        CrossoverState::WaitingToSell if diff > 0.0 => {
            (Some(Recommendation::buy()), CrossoverState::WaitingToBuy)
        }
        CrossoverState::WaitingToBuy if diff < 0.0 => {
            (Some(Recommendation::sell()), CrossoverState::WaitingToSell)
        }
        _ => (None, state),
    }
}

#[derive(Debug, Clone)]
pub struct CrossoverDetector {
    short: RollingWindow,
    long: RollingWindow,
    state: CrossoverState,
}

impl CrossoverDetector {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, EngineError> {
        Ok(Self {
            short: RollingWindow::try_new(short_window)?,
            long: RollingWindow::try_new(long_window)?,
            state: CrossoverState::default(),
        })
    }

    pub fn from_config(cfg: &EngineConfig) -> Result<Self, EngineError> {
        cfg.validate()?;
        Self::new(cfg.short_window, cfg.long_window)
    }

    pub fn ingest(&mut self, sample: &PriceSample) {
        self.short.add(sample.price);
        self.long.add(sample.price);
    }

    /// `short_avg - long_avg` over the current window contents.
    pub fn spread(&self) -> f64 {
        self.short.average() - self.long.average()
    }

    /// Applies the transition rule and returns the recommendation, if any.
    pub fn evaluate(&mut self) -> Option<Recommendation> {
        let (rec, next) = decide(self.spread(), self.state);
        self.state = next;
        rec
    }

    pub fn state(&self) -> CrossoverState {
        self.state
    }

    pub fn short_average(&self) -> f64 {
        self.short.average()
    }

    pub fn long_average(&self) -> f64 {
        self.long.average()
    }

    /// Number of samples held by the long window.
    pub fn depth(&self) -> usize {
        self.long.len()
    }
}
