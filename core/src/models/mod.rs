pub mod pair;
pub mod price;
pub mod recommendation;

pub use pair::{BITCOIN, DOLLAR, ETHEREUM, Pair, PairParseError};
pub use price::PriceSample;
pub use recommendation::{FULL_CONFIDENCE, Recommendation};
