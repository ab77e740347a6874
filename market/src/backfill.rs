//! Historical warm-up for the signal engine's windows.
//!
//! Before live polling starts, the producer replays recent closes into the
//! queue, oldest first, so both moving averages begin with real history
//! instead of a cold start.

use common::time::daily_timestamps;
use corelib::{Pair, PriceSample};
use tokio::sync::mpsc::Sender;
use tracing::{info, instrument, warn};

use crate::cryptocompare::CryptoCompareClient;
use crate::error::FeedError;
use crate::feed::PriceFeed;

/// Pushes one close per day for the `days` days before `now`.
///
/// A day whose fetch fails is logged and skipped. Stops early if the queue
/// is closed. Returns how many samples were queued.
#[instrument(skip(feed, pair, tx), fields(pair = %pair))]
pub async fn backfill_daily<F>(
    feed: &F,
    pair: &Pair,
    days: u32,
    now: i64,
    tx: &Sender<PriceSample>,
) -> usize
where
    F: PriceFeed + ?Sized,
{
    let mut queued = 0;

    for ts in daily_timestamps(now, days) {
        match feed.poll_historical(pair, ts).await {
            Ok(price) => {
                if tx.send(PriceSample::new(price, ts)).await.is_err() {
                    warn!(queued, "price queue closed during backfill");
                    return queued;
                }
                queued += 1;
            }
            Err(e) => {
                warn!(ts, error = %e, "historical price unavailable; skipping day");
            }
        }
    }

    info!(queued, requested = days, "daily backfill complete");
    queued
}

/// Pushes the closes of the last `limit` hourly bars (each `aggregate`
/// hours wide) in one request. Bars without a close are logged and skipped.
#[instrument(skip(client, pair, tx), fields(pair = %pair))]
pub async fn backfill_hourly(
    client: &CryptoCompareClient,
    pair: &Pair,
    limit: u32,
    aggregate: u32,
    exchange: &str,
    tx: &Sender<PriceSample>,
) -> Result<usize, FeedError> {
    let bars = client.hourly_bars(pair, limit, aggregate, exchange).await?;

    let mut queued = 0;
    for bar in &bars {
        if !bar.has_close() {
            warn!(ts = bar.time, close = bar.close, "hourly bar has no close; skipping");
            continue;
        }
        if tx.send(bar.to_sample()).await.is_err() {
            warn!(queued, "price queue closed during backfill");
            break;
        }
        queued += 1;
    }

    info!(queued, bars = bars.len(), "hourly backfill complete");
    Ok(queued)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::time::SECS_PER_DAY;
    use tokio::sync::mpsc;

    /// Price equals the requested day index; one day is missing.
    struct GappyHistory {
        now: i64,
        missing_day: i64,
    }

    #[async_trait]
    impl PriceFeed for GappyHistory {
        async fn poll_current(&self, _pair: &Pair) -> Result<f64, FeedError> {
            unreachable!()
        }

        async fn poll_historical(&self, _pair: &Pair, ts: i64) -> Result<f64, FeedError> {
            let days_ago = (self.now - ts) / SECS_PER_DAY;
            if days_ago == self.missing_day {
                return Err(FeedError::Api("no data".into()));
            }
            Ok(days_ago as f64)
        }
    }

    #[tokio::test]
    async fn queues_days_oldest_first_and_skips_failures() {
        let now = 1_700_000_000;
        let feed = GappyHistory { now, missing_day: 2 };
        let (tx, mut rx) = mpsc::channel(16);

        let queued = backfill_daily(&feed, &Pair::new("BTC", "USD"), 4, now, &tx).await;
        drop(tx);

        let mut samples = Vec::new();
        while let Some(s) = rx.recv().await {
            samples.push(s);
        }

        assert_eq!(queued, 3);
        assert_eq!(
            samples.iter().map(|s| s.price).collect::<Vec<_>>(),
            vec![4.0, 3.0, 1.0]
        );
        assert!(samples.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[tokio::test]
    async fn stops_when_queue_closes() {
        let now = 1_700_000_000;
        let feed = GappyHistory { now, missing_day: -1 };
        let (tx, rx) = mpsc::channel(16);
        drop(rx);

        let queued = backfill_daily(&feed, &Pair::new("ETH", "USD"), 20, now, &tx).await;
        assert_eq!(queued, 0);
    }
}
