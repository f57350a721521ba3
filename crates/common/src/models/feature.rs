use serde::{Deserialize, Serialize};

/// Per-asset market/on-chain/social features for one cycle.
///
/// Immutable once produced; exactly one per asset per cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub asset: String,
    pub price: f64,
    pub volume: f64,
    /// 24h price change in percent, signed.
    pub change_24h: f64,
    /// Aggregated social media mood, 0-100.
    pub social_sentiment: u8,
    /// Count of large-holder on-chain actions detected.
    pub whale_activity: u32,
    /// Composite technical indicator score, 0-100.
    pub technical_score: u8,
}
