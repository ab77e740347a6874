use async_trait::async_trait;
use corelib::{Pair, Recommendation};
use tokio::sync::mpsc::Sender;
use tracing::{error, info};

/// Downstream consumer of recommendations. Invoked once per emitted signal;
/// no acknowledgement is expected.
#[async_trait]
pub trait RecommendationSink: Send + Sync + 'static {
    async fn on_recommendation(&self, rec: Recommendation);
}

/// Forwards into a bounded queue, waiting while the queue is full.
#[async_trait]
impl RecommendationSink for Sender<Recommendation> {
    async fn on_recommendation(&self, rec: Recommendation) {
        if let Err(e) = self.send(rec).await {
            let dropped = e.0;
            error!(recommendation = %dropped, "recommendation queue closed; dropping signal");
        }
    }
}

/// Logs every recommendation and does nothing else.
#[derive(Clone, Debug)]
pub struct LogSink {
    pair: Pair,
}

impl LogSink {
    pub fn new(pair: Pair) -> Self {
        Self { pair }
    }
}

#[async_trait]
impl RecommendationSink for LogSink {
    async fn on_recommendation(&self, rec: Recommendation) {
        info!(
            pair = %self.pair,
            buy = rec.buy,
            confidence = rec.confidence,
            "recommendation: {rec}"
        );
    }
}
