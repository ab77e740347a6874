use clap::{Parser, ValueEnum};
use corelib::Pair;
use market::cryptocompare::{DEFAULT_BASE_URL, DEFAULT_EXCHANGE};

/// Where the engine's windows get their history before live polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackfillSource {
    /// One historical close per day.
    Daily,
    /// Closes of hourly bars from a single request.
    Hourly,
    /// Start cold.
    None,
}

/// What wakes the signal engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TickMode {
    Interval,
    Arrival,
}

#[derive(Debug, Parser)]
#[clap(name = "fugger", version, about = "Moving-average crossover signals on crypto prices")]
pub struct Cli {
    /// Pairs to watch (comma-separated, BASE/QUOTE)
    #[clap(long, env = "FUGGER_PAIRS", value_delimiter = ',', default_value = "BTC/USD")]
    pub pairs: Vec<Pair>,

    /// Samples in the short moving average
    #[clap(long, env = "FUGGER_SHORT_WINDOW", default_value_t = 5)]
    pub short_window: usize,

    /// Samples in the long moving average
    #[clap(long, env = "FUGGER_LONG_WINDOW", default_value_t = 20)]
    pub long_window: usize,

    #[clap(long, env = "FUGGER_BACKFILL", value_enum, default_value_t = BackfillSource::Daily)]
    pub backfill: BackfillSource,

    /// Days of history replayed before polling
    #[clap(long, env = "FUGGER_BACKFILL_DAYS", default_value_t = 20)]
    pub backfill_days: u32,

    /// Hours per bar for hourly backfill
    #[clap(long, env = "FUGGER_HOURLY_AGGREGATE", default_value_t = 1)]
    pub hourly_aggregate: u32,

    /// Exchange used for hourly bars
    #[clap(long, env = "FUGGER_EXCHANGE", default_value = DEFAULT_EXCHANGE)]
    pub exchange: String,

    /// Seconds between live price polls
    #[clap(long, env = "FUGGER_POLL_SECS", default_value_t = 86_400)]
    pub poll_secs: u64,

    /// Upper bound on one price request, in seconds
    #[clap(long, env = "FUGGER_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    #[clap(long, env = "FUGGER_TICK_MODE", value_enum, default_value_t = TickMode::Interval)]
    pub tick_mode: TickMode,

    /// Engine evaluation cadence in interval mode, in milliseconds
    #[clap(long, env = "FUGGER_TICK_MS", default_value_t = 1_000)]
    pub tick_ms: u64,

    /// Capacity of the price and recommendation queues
    #[clap(long, env = "FUGGER_QUEUE_CAPACITY", default_value_t = 256)]
    pub queue_capacity: usize,

    /// Quote-currency balance each paper wallet starts with
    #[clap(long, env = "FUGGER_STARTING_BALANCE", default_value_t = 10_000.0)]
    pub starting_balance: f64,

    #[clap(long, env = "FUGGER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// How long a spot price may be reused, in seconds
    #[clap(long, env = "FUGGER_CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: u64,

    /// Emit logs as JSON lines
    #[clap(long, env = "FUGGER_JSON_LOGS")]
    pub json_logs: bool,
}
