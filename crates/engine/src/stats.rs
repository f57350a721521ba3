use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};

use common::models::{ExecutionOutcome, TradingStats};

struct Inner {
    stats: TradingStats,
    last_update_day: Option<NaiveDate>,
}

/// Single source of truth for trade counters.
///
/// `record` is the sole mutator; `snapshot` is safe from any number of
/// concurrent readers and always returns a consistent copy. The daily
/// profit counter resets lazily on the first write after a UTC date
/// boundary, never on a timer.
pub struct StatsAggregator {
    inner: Mutex<Inner>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                stats: TradingStats::default(),
                last_update_day: None,
            }),
        }
    }

    pub fn record(&self, outcome: &ExecutionOutcome) {
        self.record_at(outcome, Utc::now());
    }

    /// Clock-injected variant of [`record`](Self::record); the public entry
    /// point always passes `Utc::now()`.
    pub fn record_at(&self, outcome: &ExecutionOutcome, now: DateTime<Utc>) {
        let mut inner = self.inner.lock().expect("stats lock poisoned");

        let today = now.date_naive();
        if inner.last_update_day.is_some_and(|day| day != today) {
            inner.stats.today_profit = 0.0;
        }
        inner.last_update_day = Some(today);

        inner.stats.total_trades += 1;
        if outcome.success {
            inner.stats.successful_trades += 1;
        } else {
            inner.stats.failed_trades += 1;
        }
        inner.stats.total_profit += outcome.profit_loss;
        inner.stats.today_profit += outcome.profit_loss;
    }

    pub fn snapshot(&self) -> TradingStats {
        self.inner.lock().expect("stats lock poisoned").stats.clone()
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
