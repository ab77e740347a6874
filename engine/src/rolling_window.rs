use std::num::NonZeroUsize;

use crate::error::EngineError;

/// Fixed-capacity circular buffer of the most recent prices.
///
/// Values age out by being overwritten; nothing is ever removed.
/// `average()` is the plain arithmetic mean of the values actually written,
/// so a window that has seen fewer than `capacity` values averages only
/// those. An empty window averages to `0.0`.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    values: Vec<f64>,
    cursor: usize,
    full: bool,
}

impl RollingWindow {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            values: vec![0.0; capacity.get()],
            cursor: 0,
            full: false,
        }
    }

    pub fn try_new(capacity: usize) -> Result<Self, EngineError> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or(EngineError::InvalidWindow { capacity })
    }

    /// Writes `value` at the cursor, evicting the oldest value once full.
    pub fn add(&mut self, value: f64) {
        self.values[self.cursor] = value;
        self.cursor = (self.cursor + 1) % self.values.len();

        if !self.full && self.cursor == 0 {
            self.full = true;
        }
    }

    pub fn average(&self) -> f64 {
        let filled = self.len();
        if filled == 0 {
            return 0.0;
        }

        let sum: f64 = self.values[..filled].iter().sum();
        sum / filled as f64
    }

    /// Number of slots holding a written value.
    pub fn len(&self) -> usize {
        if self.full {
            self.values.len()
        } else {
            self.cursor
        }
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.full
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window(capacity: usize) -> RollingWindow {
        RollingWindow::try_new(capacity).unwrap()
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn fresh_window_averages_to_zero() {
        let w = window(4);
        assert_eq!(w.average(), 0.0);
        assert!(w.is_empty());
        assert!(!w.is_full());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            RollingWindow::try_new(0),
            Err(EngineError::InvalidWindow { capacity: 0 })
        ));
    }

    #[test]
    fn capacity_three_evicts_oldest_on_fourth_add() {
        let mut w = window(3);
        let mut seen = Vec::new();

        for v in [1.0, 2.0, 3.0, 4.0] {
            w.add(v);
            seen.push(w.average());
        }

        assert_eq!(seen, vec![1.0, 1.5, 2.0, 3.0]);
        assert!(w.is_full());
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn capacity_one_tracks_latest_value() {
        let mut w = window(1);
        w.add(7.0);
        assert!(w.is_full());
        assert_eq!(w.average(), 7.0);

        w.add(-3.0);
        assert_eq!(w.average(), -3.0);
    }

    #[test]
    fn average_is_idempotent() {
        let mut w = window(5);
        for v in [3.0, 9.0, 4.5] {
            w.add(v);
        }

        let first = w.average();
        for _ in 0..10 {
            assert_eq!(w.average(), first);
        }
    }

    proptest! {
        #[test]
        fn partial_window_averages_values_added(
            capacity in 2usize..32,
            values in prop::collection::vec(-1.0e6f64..1.0e6, 1..32),
        ) {
            prop_assume!(values.len() < capacity);

            let mut w = window(capacity);
            for v in &values {
                w.add(*v);
            }

            prop_assert!(!w.is_full());
            prop_assert!((w.average() - mean(&values)).abs() < 1e-6);
        }

        #[test]
        fn full_window_averages_most_recent_values(
            capacity in 1usize..16,
            values in prop::collection::vec(-1.0e6f64..1.0e6, 1..64),
        ) {
            let mut w = window(capacity);
            for v in &values {
                w.add(*v);
            }

            let start = values.len().saturating_sub(capacity);
            prop_assert!((w.average() - mean(&values[start..])).abs() < 1e-6);
        }

        #[test]
        fn one_more_value_evicts_the_oldest(
            values in prop::collection::vec(-1.0e3f64..1.0e3, 2..24),
        ) {
            let capacity = values.len() - 1;
            let mut w = window(capacity);

            for v in &values[..capacity] {
                w.add(*v);
            }
            prop_assert!((w.average() - mean(&values[..capacity])).abs() < 1e-9);

            w.add(values[capacity]);
            prop_assert!((w.average() - mean(&values[1..])).abs() < 1e-9);
        }
    }
}
