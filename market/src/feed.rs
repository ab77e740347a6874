use std::sync::Arc;

use async_trait::async_trait;
use corelib::Pair;

use crate::error::FeedError;

/// Source of spot and historical prices for a currency pair.
///
/// Prices are units of `pair.quote` per one unit of `pair.base`.
#[async_trait]
pub trait PriceFeed: Send + Sync + 'static {
    async fn poll_current(&self, pair: &Pair) -> Result<f64, FeedError>;

    /// Closing price at `unix_ts` (seconds).
    async fn poll_historical(&self, pair: &Pair, unix_ts: i64) -> Result<f64, FeedError>;
}

#[async_trait]
impl<F: PriceFeed + ?Sized> PriceFeed for Arc<F> {
    async fn poll_current(&self, pair: &Pair) -> Result<f64, FeedError> {
        (**self).poll_current(pair).await
    }

    async fn poll_historical(&self, pair: &Pair, unix_ts: i64) -> Result<f64, FeedError> {
        (**self).poll_historical(pair, unix_ts).await
    }
}
