use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("rolling window capacity must be at least 1, got {capacity}")]
    InvalidWindow { capacity: usize },

    #[error("short window ({short}) must be shorter than long window ({long})")]
    WindowOrder { short: usize, long: usize },

    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
}
