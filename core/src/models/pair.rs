use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Currency ticker symbols used by the default pipelines.
pub const BITCOIN: &str = "BTC";
pub const ETHEREUM: &str = "ETH";
pub const DOLLAR: &str = "USD";

/// A currency pair: price of one unit of `base`, expressed in `quote`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub base: String,
    pub quote: String,
}

impl Pair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    pub fn id(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairParseError {
    #[error("pair must look like BASE/QUOTE, got {0:?}")]
    Format(String),

    #[error("pair {0:?} uses the same currency on both sides")]
    SameCurrency(String),
}

impl FromStr for Pair {
    type Err = PairParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| PairParseError::Format(s.to_string()))?;

        let (base, quote) = (base.trim(), quote.trim());
        let valid = |sym: &str| !sym.is_empty() && sym.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid(base) || !valid(quote) {
            return Err(PairParseError::Format(s.to_string()));
        }

        let pair = Pair::new(base, quote);
        if pair.base == pair.quote {
            return Err(PairParseError::SameCurrency(s.to_string()));
        }

        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_case() {
        let p: Pair = " btc/usd ".parse().unwrap();
        assert_eq!(p, Pair::new(BITCOIN, DOLLAR));
        assert_eq!(p.id(), "BTC/USD");
        assert_eq!(p.to_string(), "BTC/USD");
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(matches!("BTCUSD".parse::<Pair>(), Err(PairParseError::Format(_))));
        assert!(matches!("BTC/".parse::<Pair>(), Err(PairParseError::Format(_))));
        assert!(matches!("B-C/USD".parse::<Pair>(), Err(PairParseError::Format(_))));
        assert!(matches!(
            "eth/ETH".parse::<Pair>(),
            Err(PairParseError::SameCurrency(_))
        ));
    }
}
