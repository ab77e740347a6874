use std::time::Duration;

use corelib::Pair;
use engine::{EngineConfig, EngineError, TickSource};
use market::CacheConfig;
use market::poller::PollerConfig;
use thiserror::Error;

use crate::cli::{BackfillSource, Cli, TickMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one pair is required")]
    NoPairs,

    #[error("pair {0} is listed more than once")]
    DuplicatePair(Pair),

    #[error("queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("starting balance must be positive and finite, got {0}")]
    StartingBalance(f64),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// History replayed into each pipeline before live polling.
#[derive(Clone, Debug, PartialEq)]
pub enum Backfill {
    Daily {
        days: u32,
    },
    Hourly {
        limit: u32,
        aggregate: u32,
        exchange: String,
    },
    None,
}

/// Validated runtime settings. Every component gets its slice of this
/// through its constructor.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub pairs: Vec<Pair>,
    pub engine: EngineConfig,
    pub poller: PollerConfig,
    pub cache: CacheConfig,
    pub backfill: Backfill,

    /// Capacity of every bounded queue. A full queue blocks its producer.
    pub queue_capacity: usize,

    pub starting_balance: f64,
    pub base_url: String,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        if cli.pairs.is_empty() {
            return Err(ConfigError::NoPairs);
        }
        for (i, pair) in cli.pairs.iter().enumerate() {
            if cli.pairs[..i].contains(pair) {
                return Err(ConfigError::DuplicatePair(pair.clone()));
            }
        }

        if cli.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if cli.poll_secs == 0 {
            return Err(ConfigError::ZeroDuration("poll interval"));
        }
        if cli.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("request timeout"));
        }
        if !cli.starting_balance.is_finite() || cli.starting_balance <= 0.0 {
            return Err(ConfigError::StartingBalance(cli.starting_balance));
        }

        let tick = match cli.tick_mode {
            TickMode::Interval => TickSource::Interval(Duration::from_millis(cli.tick_ms)),
            TickMode::Arrival => TickSource::FeedArrival,
        };
        let engine = EngineConfig {
            short_window: cli.short_window,
            long_window: cli.long_window,
            tick,
        };
        engine.validate()?;

        let backfill = match cli.backfill {
            BackfillSource::Daily => Backfill::Daily {
                days: cli.backfill_days,
            },
            BackfillSource::Hourly => {
                let aggregate = cli.hourly_aggregate.max(1);
                Backfill::Hourly {
                    limit: cli.backfill_days.saturating_mul(24) / aggregate,
                    aggregate,
                    exchange: cli.exchange,
                }
            }
            BackfillSource::None => Backfill::None,
        };

        Ok(Self {
            pairs: cli.pairs,
            engine,
            poller: PollerConfig {
                poll_every: Duration::from_secs(cli.poll_secs),
                request_timeout: Duration::from_secs(cli.request_timeout_secs),
            },
            cache: CacheConfig {
                current_ttl: Duration::from_secs(cli.cache_ttl_secs),
                ..CacheConfig::default()
            },
            backfill,
            queue_capacity: cli.queue_capacity,
            starting_balance: cli.starting_balance,
            base_url: cli.base_url,
        })
    }
}
