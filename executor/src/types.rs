//! Common types used by the recommendation consumer.

use thiserror::Error;

/// A completed all-in conversion between two currencies.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    /// Units of `from` given up.
    pub spent: f64,
    /// Units of `to` received.
    pub received: f64,
    /// Units of `to` per unit of `from`.
    pub rate: f64,
}

/// What happened to one recommendation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumerOutcome {
    /// Balance moved to the recommended side.
    Converted(Conversion),
    /// Nothing held on the side to convert from.
    NothingToConvert,
}

#[derive(Debug, Error, PartialEq)]
pub enum WalletError {
    #[error("currency {0} is not tracked by this wallet")]
    UnknownCurrency(String),

    #[error("conversion rate must be positive and finite, got {0}")]
    InvalidRate(f64),

    #[error("deposit must be positive and finite, got {0}")]
    InvalidAmount(f64),
}
