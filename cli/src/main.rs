pub mod cli;
pub mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, info, warn};

use cli::Cli;
use common::logger::{TraceId, child_span, init_logger, root_span};
use common::time::now_secs;
use config::{AppConfig, Backfill};
use corelib::{Pair, PriceSample, Recommendation};
use engine::{EngineStats, SignalEngine};
use executor::{PaperWallet, run_wallet_consumer};
use market::backfill::{backfill_daily, backfill_hourly};
use market::poller::{PollerConfig, run_price_poller};
use market::{CachedFeed, CryptoCompareClient};

type SharedFeed = Arc<CachedFeed<CryptoCompareClient>>;

/// The three tasks serving one pair.
struct Pipeline {
    pair: Pair,
    producer: JoinHandle<()>,
    engine: JoinHandle<EngineStats>,
    consumer: JoinHandle<PaperWallet>,
}

/// What a pipeline left behind once stopped.
#[derive(Debug)]
struct PipelineReport {
    stats: EngineStats,
    wallet: PaperWallet,
}

impl Pipeline {
    /// Stops the producer, then lets the engine drain what is queued and the
    /// consumer settle the last recommendations.
    async fn shutdown(self) -> anyhow::Result<PipelineReport> {
        self.producer.abort();

        let stats = self.engine.await.context("engine task failed")?;
        let wallet = self.consumer.await.context("wallet consumer task failed")?;

        info!(
            pair = %self.pair,
            samples = stats.samples,
            buys = stats.buys,
            sells = stats.sells,
            base = wallet.balance(&self.pair.base).unwrap_or(0.0),
            quote = wallet.balance(&self.pair.quote).unwrap_or(0.0),
            "pipeline stopped"
        );
        Ok(PipelineReport { stats, wallet })
    }
}

/// Backfill, then poll until the engine side of the queue goes away.
///
/// History goes through the shared cache. Live polls go straight to the
/// client so every tick is a fresh observation.
async fn produce(
    pair: Pair,
    backfill: Backfill,
    poller: PollerConfig,
    feed: SharedFeed,
    tx: mpsc::Sender<PriceSample>,
) {
    match backfill {
        Backfill::Daily { days } => {
            backfill_daily(&feed, &pair, days, now_secs(), &tx).await;
        }
        Backfill::Hourly {
            limit,
            aggregate,
            exchange,
        } => {
            if let Err(e) = backfill_hourly(feed.inner(), &pair, limit, aggregate, &exchange, &tx).await {
                warn!(error = %e, "hourly backfill failed; starting with live prices only");
            }
        }
        Backfill::None => {}
    }

    let live = feed.inner().clone();
    let stats = run_price_poller(pair, poller, live, tx).await;
    info!(published = stats.published, failed = stats.failed, "producer finished");
}

/// Wires producer → engine → consumer for one pair.
fn start_pipeline(pair: Pair, cfg: &AppConfig, feed: SharedFeed) -> anyhow::Result<Pipeline> {
    let trace_id = TraceId::new();
    let root = root_span("pipeline", &trace_id, &pair.id());
    let _entered = root.enter();

    let (price_tx, price_rx) = mpsc::channel::<PriceSample>(cfg.queue_capacity);
    let (rec_tx, rec_rx) = mpsc::channel::<Recommendation>(cfg.queue_capacity);

    let engine = SignalEngine::new(pair.clone(), &cfg.engine, price_rx, rec_tx)
        .with_context(|| format!("cannot build signal engine for {pair}"))?;

    let mut wallet = PaperWallet::new([pair.quote.clone(), pair.base.clone()]);
    wallet
        .deposit(&pair.quote, cfg.starting_balance)
        .context("cannot fund paper wallet")?;

    let producer = tokio::spawn(
        produce(
            pair.clone(),
            cfg.backfill.clone(),
            cfg.poller,
            Arc::clone(&feed),
            price_tx,
        )
        .instrument(child_span("producer")),
    );

    let engine = tokio::spawn(engine.run().instrument(child_span("engine")));

    let consumer = tokio::spawn(
        run_wallet_consumer(
            pair.clone(),
            rec_rx,
            feed,
            wallet,
            cfg.poller.request_timeout,
        )
        .instrument(child_span("consumer")),
    );

    info!(trace_id = %trace_id, "pipeline started");

    Ok(Pipeline {
        pair,
        producer,
        engine,
        consumer,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger("fugger", cli.json_logs);

    let cfg = AppConfig::from_cli(cli).context("invalid configuration")?;

    info!(
        pairs = ?cfg.pairs.iter().map(Pair::id).collect::<Vec<_>>(),
        short = cfg.engine.short_window,
        long = cfg.engine.long_window,
        "Starting fugger..."
    );

    let client = CryptoCompareClient::new(cfg.base_url.clone(), cfg.poller.request_timeout)
        .context("cannot build CryptoCompare client")?;
    let feed: SharedFeed = Arc::new(CachedFeed::new(client, cfg.cache));

    let pipelines = cfg
        .pairs
        .iter()
        .map(|pair| start_pipeline(pair.clone(), &cfg, Arc::clone(&feed)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    for result in join_all(pipelines.into_iter().map(Pipeline::shutdown)).await {
        if let Err(e) = result {
            warn!(error = ?e, "pipeline did not stop cleanly");
        }
    }

    let cache = feed.stats();
    info!(hits = cache.hits, misses = cache.misses, "price cache totals");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use engine::{EngineConfig, TickSource};
    use market::CacheConfig;
    use mockito::{Matcher, Server};

    fn test_config(base_url: String) -> AppConfig {
        AppConfig {
            pairs: vec![Pair::new("BTC", "USD")],
            engine: EngineConfig {
                short_window: 1,
                long_window: 2,
                tick: TickSource::FeedArrival,
            },
            poller: PollerConfig {
                poll_every: Duration::from_millis(50),
                request_timeout: Duration::from_secs(2),
            },
            cache: CacheConfig::default(),
            backfill: Backfill::Daily { days: 2 },
            queue_capacity: 16,
            starting_balance: 10_000.0,
            base_url,
        }
    }

    #[tokio::test]
    async fn pipeline_backfills_polls_signals_and_trades() -> anyhow::Result<()> {
        let mut server = Server::new_async().await;
        let history = server
            .mock("GET", "/data/pricehistorical")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"BTC":{"USD":40.0}}"#)
            .expect(2)
            .create_async()
            .await;
        // Live polls bypass the cache, so every tick reaches the server even
        // though the spot TTL is five minutes.
        let spot = server
            .mock("GET", "/data/price")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"USD":100.0}"#)
            .expect_at_least(3)
            .create_async()
            .await;

        let cfg = test_config(server.url());
        let client = CryptoCompareClient::new(cfg.base_url.clone(), cfg.poller.request_timeout)?;
        let feed: SharedFeed = Arc::new(CachedFeed::new(client, cfg.cache));

        let pipeline = start_pipeline(cfg.pairs[0].clone(), &cfg, Arc::clone(&feed))?;
        tokio::time::sleep(Duration::from_millis(400)).await;
        let report = pipeline.shutdown().await?;

        history.assert_async().await;
        spot.assert_async().await;

        assert!(report.stats.samples >= 5);
        assert_eq!((report.stats.buys, report.stats.sells), (1, 0));
        assert_eq!(report.wallet.balance("BTC"), Some(100.0));
        assert_eq!(report.wallet.balance("USD"), Some(0.0));
        Ok(())
    }
}
