//! Live price poller.
//!
//! Periodically asks a [`PriceFeed`] for the spot price of one pair and
//! pushes the result into the engine's queue as a [`PriceSample`].
//!
//! Data flow:
//! PriceFeed → Poller → mpsc queue → SignalEngine
//!
//! A failed or timed-out request is logged and skipped; the next tick tries
//! again with the engine's windows untouched.

use std::time::Duration;

use common::logger::warn_if_slow;
use common::time::{MonotonicStamp, now_secs};
use corelib::{Pair, PriceSample};
use tokio::sync::mpsc::Sender;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, info, instrument, warn};

use crate::error::FeedError;
use crate::feed::PriceFeed;

/// Poller cadence and request bounds.
#[derive(Clone, Copy, Debug)]
pub struct PollerConfig {
    pub poll_every: Duration,
    pub request_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_every: Duration::from_secs(24 * 60 * 60),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Counters reported when the poller exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollStats {
    pub published: u64,
    pub failed: u64,
}

/// Fetches one spot price, bounded by `request_timeout`.
pub async fn poll_once<F>(
    feed: &F,
    pair: &Pair,
    request_timeout: Duration,
) -> Result<PriceSample, FeedError>
where
    F: PriceFeed + ?Sized,
{
    let fetch = timeout(request_timeout, feed.poll_current(pair));

    let price = warn_if_slow("poll_current", request_timeout / 2, fetch)
        .await
        .map_err(|_| FeedError::Timeout(request_timeout))??;

    Ok(PriceSample::new(price, now_secs()))
}

/// Runs the poller until the receiving side of `tx` is dropped.
///
/// The first poll happens immediately, then once per `poll_every`. Sends
/// wait while the queue is full. Published timestamps never decrease.
#[instrument(skip(pair, cfg, feed, tx), fields(pair = %pair))]
pub async fn run_price_poller<F>(
    pair: Pair,
    cfg: PollerConfig,
    feed: F,
    tx: Sender<PriceSample>,
) -> PollStats
where
    F: PriceFeed,
{
    let mut ticker = interval(cfg.poll_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut stats = PollStats::default();
    let mut stamps = MonotonicStamp::default();

    info!(
        every_ms = cfg.poll_every.as_millis() as u64,
        timeout_ms = cfg.request_timeout.as_millis() as u64,
        "price poller started"
    );

    loop {
        tokio::select! {
            biased;
            _ = tx.closed() => break,
            _ = ticker.tick() => {}
        }

        match poll_once(&feed, &pair, cfg.request_timeout).await {
            Ok(mut sample) => {
                let ts = stamps.next(sample.timestamp);
                if ts != sample.timestamp {
                    warn!(clock = sample.timestamp, last = ts, "wall clock went backwards; holding timestamp");
                    sample.timestamp = ts;
                }
                debug!(price = sample.price, ts = sample.timestamp, "price polled");

                if tx.send(sample).await.is_err() {
                    break;
                }
                stats.published += 1;
            }
            Err(e) => {
                stats.failed += 1;
                warn!(error = %e, failed = stats.failed, "price poll failed; retrying next tick");
            }
        }
    }

    info!(
        published = stats.published,
        failed = stats.failed,
        "price queue closed; poller stopped"
    );
    stats
}
