pub mod client;
pub mod parser;
pub mod types;

pub use client::{CryptoCompareClient, DEFAULT_BASE_URL, DEFAULT_EXCHANGE};
pub use types::HistoBar;
