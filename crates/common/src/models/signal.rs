use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A directional trading recommendation for one asset.
///
/// Produced from exactly one [`FeatureSnapshot`](super::FeatureSnapshot),
/// consumed once by the cycle runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub asset: String,
    pub side: Side,
    /// Clamped to 50-95.
    pub confidence: u8,
    /// One of the fixed reason wordings chosen by the scorer.
    pub reason: String,
    pub price: f64,
    pub generated_at: DateTime<Utc>,
}
