use std::time::Duration;

use async_trait::async_trait;
use corelib::Pair;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use super::parser;
use super::types::HistoBar;
use crate::error::FeedError;
use crate::feed::PriceFeed;

pub const DEFAULT_BASE_URL: &str = "https://min-api.cryptocompare.com";

/// Aggregated index used when no exchange is named.
pub const DEFAULT_EXCHANGE: &str = "CCCAGG";

/// HTTP client for the public CryptoCompare price API.
#[derive(Clone)]
pub struct CryptoCompareClient {
    http: Client,
    base_url: String,
}

impl CryptoCompareClient {
    /// `request_timeout` bounds every request end to end.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, FeedError> {
        let http = Client::builder()
            .user_agent(concat!("fugger/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FeedError> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self.http.get(&url).query(query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text().await?;
        parser::parse_body(&body)
    }

    /// `GET /data/price?fsym=BTC&tsyms=USD`
    #[instrument(skip(self, pair), fields(pair = %pair), level = "debug")]
    pub async fn current_price(&self, pair: &Pair) -> Result<f64, FeedError> {
        let value = self
            .get(
                "/data/price",
                &[("fsym", pair.base.clone()), ("tsyms", pair.quote.clone())],
            )
            .await?;

        let price = parser::current_price(&value, &pair.quote)?;
        debug!(price, "current price fetched");
        Ok(price)
    }

    /// `GET /data/pricehistorical?fsym=BTC&tsyms=USD&ts=...`
    #[instrument(skip(self, pair), fields(pair = %pair), level = "debug")]
    pub async fn historical_price(&self, pair: &Pair, unix_ts: i64) -> Result<f64, FeedError> {
        let value = self
            .get(
                "/data/pricehistorical",
                &[
                    ("fsym", pair.base.clone()),
                    ("tsyms", pair.quote.clone()),
                    ("ts", unix_ts.to_string()),
                ],
            )
            .await?;

        let price = parser::historical_price(&value, &pair.base, &pair.quote)?;
        debug!(price, unix_ts, "historical price fetched");
        Ok(price)
    }

    /// `GET /data/histohour`: the last `limit` bars, each spanning
    /// `aggregate` hours, oldest first.
    #[instrument(skip(self, pair), fields(pair = %pair), level = "debug")]
    pub async fn hourly_bars(
        &self,
        pair: &Pair,
        limit: u32,
        aggregate: u32,
        exchange: &str,
    ) -> Result<Vec<HistoBar>, FeedError> {
        let value = self
            .get(
                "/data/histohour",
                &[
                    ("fsym", pair.base.clone()),
                    ("tsym", pair.quote.clone()),
                    ("limit", limit.to_string()),
                    ("aggregate", aggregate.max(1).to_string()),
                    ("e", exchange.to_string()),
                ],
            )
            .await?;

        let mut bars = parser::hourly_bars(&value)?;
        bars.sort_by_key(|b| b.time);
        debug!(bars = bars.len(), "hourly bars fetched");
        Ok(bars)
    }
}

#[async_trait]
impl PriceFeed for CryptoCompareClient {
    async fn poll_current(&self, pair: &Pair) -> Result<f64, FeedError> {
        self.current_price(pair).await
    }

    async fn poll_historical(&self, pair: &Pair, unix_ts: i64) -> Result<f64, FeedError> {
        self.historical_price(pair, unix_ts).await
    }
}
