pub mod config;
pub mod crossover;
pub mod error;
pub mod rolling_window;
pub mod signal_engine;
pub mod sink;

pub use config::{EngineConfig, TickSource};
pub use crossover::{CrossoverDetector, CrossoverState};
pub use error::EngineError;
pub use rolling_window::RollingWindow;
pub use signal_engine::{EngineStats, SignalEngine, StepOutcome};
pub use sink::{LogSink, RecommendationSink};
