pub mod backfill;
pub mod cache;
pub mod cryptocompare;
pub mod error;
pub mod feed;
pub mod poller;

pub use cache::{CacheConfig, CachedFeed};
pub use cryptocompare::CryptoCompareClient;
pub use error::FeedError;
pub use feed::PriceFeed;
