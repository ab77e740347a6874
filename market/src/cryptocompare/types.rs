use corelib::PriceSample;
use serde::Deserialize;

/// One OHLCV bar from `/data/histohour`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoBar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(rename = "volumefrom", default)]
    pub volume_from: f64,
    #[serde(rename = "volumeto", default)]
    pub volume_to: f64,
}

impl HistoBar {
    /// Periods without trades come back with a zero close.
    pub fn has_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }

    /// The bar's close, stamped with the bar's open time.
    pub fn to_sample(&self) -> PriceSample {
        PriceSample::new(self.close, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(close: f64) -> HistoBar {
        HistoBar {
            time: 1_514_764_800,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close,
            volume_from: 0.0,
            volume_to: 0.0,
        }
    }

    #[test]
    fn empty_periods_have_no_close() {
        assert!(bar(13_800.0).has_close());
        assert!(!bar(0.0).has_close());
        assert!(!bar(-1.0).has_close());
        assert!(!bar(f64::NAN).has_close());
    }
}
