use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use corelib::Pair;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::error::FeedError;
use crate::feed::PriceFeed;

/// Cache sizing and expiry.
#[derive(Clone, Copy, Debug)]
pub struct CacheConfig {
    /// How long a spot price may be served from cache.
    pub current_ttl: Duration,

    /// Upper bound on cached historical closes. Oldest entries go first.
    pub max_historical: usize,

    /// Minimum spacing between sweeps of expired spot prices.
    pub cleanup_every: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            current_ttl: Duration::from_secs(5 * 60),
            max_historical: 4_096,
            cleanup_every: Duration::from_secs(10 * 60),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    price: f64,
    stored_at: Instant,
}

/// Hit/miss counters, for logs and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Read-through cache in front of any [`PriceFeed`].
///
/// Spot prices expire after `current_ttl`. Historical closes do not change
/// and are kept until `max_historical` is exceeded. Failed fetches are
/// never cached.
pub struct CachedFeed<F> {
    inner: F,
    cfg: CacheConfig,
    current: Mutex<HashMap<Pair, Entry>>,
    historical: Mutex<HashMap<(Pair, i64), Entry>>,
    last_cleanup: Mutex<Instant>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<F: PriceFeed> CachedFeed<F> {
    pub fn new(inner: F, cfg: CacheConfig) -> Self {
        Self {
            inner,
            cfg,
            current: Mutex::new(HashMap::new()),
            historical: Mutex::new(HashMap::new()),
            last_cleanup: Mutex::new(Instant::now()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Number of cached (spot, historical) entries.
    pub fn len(&self) -> (usize, usize) {
        (self.current.lock().len(), self.historical.lock().len())
    }

    fn hit(&self, price: f64) -> Result<f64, FeedError> {
        self.hits.fetch_add(1, Ordering::Relaxed);
        Ok(price)
    }

    /// Drops expired spot prices, at most once per `cleanup_every`.
    fn maybe_cleanup(&self, now: Instant) {
        {
            let mut last = self.last_cleanup.lock();
            if now.duration_since(*last) < self.cfg.cleanup_every {
                return;
            }
            *last = now;
        }

        let ttl = self.cfg.current_ttl;
        let mut current = self.current.lock();
        let before = current.len();
        current.retain(|_, e| now.duration_since(e.stored_at) < ttl);

        debug!(
            evicted = before - current.len(),
            remaining = current.len(),
            "price cache swept"
        );
    }

    fn store_historical(&self, key: (Pair, i64), price: f64, now: Instant) {
        let mut historical = self.historical.lock();

        if !historical.contains_key(&key) && historical.len() >= self.cfg.max_historical {
            let oldest = historical
                .iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone());

            if let Some(oldest) = oldest {
                historical.remove(&oldest);
            }
        }

        historical.insert(
            key,
            Entry {
                price,
                stored_at: now,
            },
        );
    }
}

#[async_trait]
impl<F: PriceFeed> PriceFeed for CachedFeed<F> {
    async fn poll_current(&self, pair: &Pair) -> Result<f64, FeedError> {
        let now = Instant::now();
        self.maybe_cleanup(now);

        let cached = self
            .current
            .lock()
            .get(pair)
            .filter(|e| now.duration_since(e.stored_at) < self.cfg.current_ttl)
            .map(|e| e.price);

        if let Some(price) = cached {
            trace!(pair = %pair, price, "spot price cache hit");
            return self.hit(price);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let price = self.inner.poll_current(pair).await?;

        self.current.lock().insert(
            pair.clone(),
            Entry {
                price,
                stored_at: Instant::now(),
            },
        );
        Ok(price)
    }

    async fn poll_historical(&self, pair: &Pair, unix_ts: i64) -> Result<f64, FeedError> {
        let key = (pair.clone(), unix_ts);

        let cached = self.historical.lock().get(&key).map(|e| e.price);
        if let Some(price) = cached {
            trace!(pair = %pair, unix_ts, price, "historical price cache hit");
            return self.hit(price);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let price = self.inner.poll_historical(pair, unix_ts).await?;

        self.store_historical(key, price, Instant::now());
        Ok(price)
    }
}
