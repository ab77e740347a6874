pub mod models;

pub use models::{Pair, PairParseError, PriceSample, Recommendation};
