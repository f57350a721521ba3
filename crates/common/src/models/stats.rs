use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cumulative trading counters.
///
/// `total_trades == successful_trades + failed_trades` holds after every
/// completed update. `today_profit` covers the current UTC day only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingStats {
    pub total_trades: u64,
    pub successful_trades: u64,
    pub failed_trades: u64,
    pub total_profit: f64,
    pub today_profit: f64,
}

/// Snapshot of engine state served verbatim to the request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub running: bool,
    /// ISO-8601 when serialized, null while never started.
    pub start_time: Option<DateTime<Utc>>,
    /// 0 whenever the engine is stopped.
    pub runtime_seconds: i64,
    pub stats: TradingStats,
}
