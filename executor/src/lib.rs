//! Consumers of crossover recommendations.

pub mod consumer;
pub mod types;
pub mod wallet;

pub use consumer::run_wallet_consumer;
pub use types::{Conversion, ConsumerOutcome, WalletError};
pub use wallet::PaperWallet;
