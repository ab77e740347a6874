//! Evaluation loop for one pair.
//!
//! Data flow:
//! Feed queue → drain into windows → crossover rule → RecommendationSink
//!
//! The engine exclusively owns both rolling windows and the crossover state.
//! The only shared state is the feed queue it reads from.

use corelib::{Pair, PriceSample, Recommendation};
use tokio::sync::mpsc::Receiver;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, instrument};

use crate::config::{EngineConfig, TickSource};
use crate::crossover::{CrossoverDetector, CrossoverState};
use crate::error::EngineError;
use crate::sink::RecommendationSink;

/// Result of one evaluation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Samples drained from the feed during this step.
    pub ingested: usize,
    /// `short_avg - long_avg` after ingesting.
    pub spread: f64,
    pub emitted: Option<Recommendation>,
    /// Every producer is gone and the queue is empty.
    pub feed_closed: bool,
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub steps: u64,
    pub samples: u64,
    pub buys: u64,
    pub sells: u64,
}

pub struct SignalEngine<S: RecommendationSink> {
    pair: Pair,
    detector: CrossoverDetector,
    tick: TickSource,
    feed_rx: Receiver<PriceSample>,
    sink: S,
    feed_closed: bool,
    stats: EngineStats,
}

impl<S: RecommendationSink> SignalEngine<S> {
    pub fn new(
        pair: Pair,
        cfg: &EngineConfig,
        feed_rx: Receiver<PriceSample>,
        sink: S,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            pair,
            detector: CrossoverDetector::from_config(cfg)?,
            tick: cfg.tick,
            feed_rx,
            sink,
            feed_closed: false,
            stats: EngineStats::default(),
        })
    }

    pub fn state(&self) -> CrossoverState {
        self.detector.state()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Pulls every sample currently queued without waiting.
    fn drain(&mut self) -> usize {
        let mut ingested = 0;
        loop {
            match self.feed_rx.try_recv() {
                Ok(sample) => {
                    self.detector.ingest(&sample);
                    ingested += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.feed_closed = true;
                    break;
                }
            }
        }
        ingested
    }

    /// One control-loop tick: drain, evaluate, forward.
    ///
    /// With nothing queued the previous averages are re-evaluated, which
    /// never fires twice in the same direction.
    pub async fn step(&mut self) -> StepOutcome {
        let ingested = self.drain();
        self.evaluate(ingested).await
    }

    async fn evaluate(&mut self, ingested: usize) -> StepOutcome {
        self.stats.steps += 1;
        self.stats.samples += ingested as u64;

        let spread = self.detector.spread();
        let emitted = self.detector.evaluate();

        debug!(
            pair = %self.pair,
            ingested,
            short_avg = self.detector.short_average(),
            long_avg = self.detector.long_average(),
            spread,
            "crossover evaluated"
        );

        if let Some(rec) = emitted {
            if rec.buy {
                self.stats.buys += 1;
            } else {
                self.stats.sells += 1;
            }

            info!(
                pair = %self.pair,
                buy = rec.buy,
                confidence = rec.confidence,
                spread,
                depth = self.detector.depth(),
                "crossover signal emitted"
            );
            self.sink.on_recommendation(rec).await;
        }

        StepOutcome {
            ingested,
            spread,
            emitted,
            feed_closed: self.feed_closed,
        }
    }

    /// Runs until every feed producer has hung up and the queue is drained.
    #[instrument(skip(self), fields(pair = %self.pair))]
    pub async fn run(mut self) -> EngineStats {
        info!(tick = ?self.tick, "signal engine started");

        match self.tick {
            TickSource::Interval(every) => {
                let mut ticker = interval(every);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    ticker.tick().await;
                    if self.step().await.feed_closed {
                        break;
                    }
                }
            }
            TickSource::FeedArrival => {
                while let Some(sample) = self.feed_rx.recv().await {
                    self.detector.ingest(&sample);
                    let ingested = 1 + self.drain();
                    if self.evaluate(ingested).await.feed_closed {
                        break;
                    }
                }
            }
        }

        info!(
            steps = self.stats.steps,
            samples = self.stats.samples,
            buys = self.stats.buys,
            sells = self.stats.sells,
            "feed closed; signal engine stopped"
        );
        self.stats
    }
}
