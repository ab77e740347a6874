use chrono::Utc;

pub const SECS_PER_DAY: i64 = 86_400;

/// Current wall-clock time in unix seconds.
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// Hands out timestamps that never go below the previous one, even if the
/// wall clock is stepped backwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicStamp {
    last: Option<i64>,
}

impl MonotonicStamp {
    pub fn next(&mut self, now: i64) -> i64 {
        let ts = self.last.map_or(now, |last| last.max(now));
        self.last = Some(ts);
        ts
    }
}

/// Unix timestamps for `days` consecutive daily closes ending just before
/// `now`, oldest first: `now - days`, `now - days + 1`, ..., `now - 1` (days).
pub fn daily_timestamps(now: i64, days: u32) -> Vec<i64> {
    let days = i64::from(days);
    (0..days).map(|i| now - (days - i) * SECS_PER_DAY).collect()
}
