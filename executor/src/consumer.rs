//! Recommendation consumer backed by a paper wallet.
//!
//! Data flow:
//! SignalEngine → recommendation queue → consumer → PaperWallet
//!
//! Each recommendation is priced with a fresh spot quote. A quote that
//! cannot be fetched drops that recommendation; the consumer keeps running.

use std::time::Duration;

use corelib::{Pair, Recommendation};
use market::PriceFeed;
use market::poller::poll_once;
use tokio::sync::mpsc::Receiver;
use tracing::{error, info, instrument, warn};

use crate::types::{ConsumerOutcome, WalletError};
use crate::wallet::PaperWallet;

/// Applies one recommendation at `price` (units of quote per unit of base).
///
/// A buy moves the whole quote balance into base; a sell moves the whole
/// base balance into quote.
pub fn apply(
    wallet: &mut PaperWallet,
    pair: &Pair,
    rec: Recommendation,
    price: f64,
) -> Result<ConsumerOutcome, WalletError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(WalletError::InvalidRate(price));
    }

    let (from, to, rate) = if rec.buy {
        (&pair.quote, &pair.base, 1.0 / price)
    } else {
        (&pair.base, &pair.quote, price)
    };

    let held = wallet
        .balance(from)
        .ok_or_else(|| WalletError::UnknownCurrency(from.clone()))?;
    if held <= 0.0 {
        return Ok(ConsumerOutcome::NothingToConvert);
    }

    wallet
        .convert_all(from, to, rate)
        .map(ConsumerOutcome::Converted)
}

/// Consumes recommendations until the queue closes, then returns the wallet.
#[instrument(skip(pair, rx, feed, wallet), fields(pair = %pair))]
pub async fn run_wallet_consumer<F>(
    pair: Pair,
    mut rx: Receiver<Recommendation>,
    feed: F,
    mut wallet: PaperWallet,
    request_timeout: Duration,
) -> PaperWallet
where
    F: PriceFeed,
{
    info!("wallet consumer started");

    while let Some(rec) = rx.recv().await {
        let price = match poll_once(&feed, &pair, request_timeout).await {
            Ok(sample) => sample.price,
            Err(e) => {
                warn!(error = %e, buy = rec.buy, "no price for recommendation; skipping");
                continue;
            }
        };

        match apply(&mut wallet, &pair, rec, price) {
            Ok(ConsumerOutcome::Converted(c)) => {
                info!(
                    from = %c.from,
                    to = %c.to,
                    spent = c.spent,
                    received = c.received,
                    price,
                    value = wallet.value_in(&pair.base, &pair.quote, price),
                    "paper conversion executed"
                );
            }
            Ok(ConsumerOutcome::NothingToConvert) => {
                info!(buy = rec.buy, price, "nothing to convert; recommendation ignored");
            }
            Err(e) => {
                error!(error = %e, buy = rec.buy, "paper conversion rejected");
            }
        }
    }

    info!(
        base = wallet.balance(&pair.base).unwrap_or(0.0),
        quote = wallet.balance(&pair.quote).unwrap_or(0.0),
        "recommendation queue closed; wallet consumer stopped"
    );
    wallet
}
