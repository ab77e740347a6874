use std::future::Future;
use std::time::Duration;

use tracing::Span;

use super::TraceId;

/// Root span for one pair pipeline. `pair` is recorded up front; children
/// inherit the trace id through the span tree.
pub fn root_span(name: &'static str, trace_id: &TraceId, pair_id: &str) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id,
        pair = %pair_id
    )
}

/// Child span for a task running inside a pipeline.
pub fn child_span(name: &'static str) -> Span {
    tracing::info_span!("child", name = %name)
}

/// Awaits `fut` and warns when it took longer than `max`.
pub async fn warn_if_slow<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = std::time::Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}
