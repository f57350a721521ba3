use chrono::Utc;

use common::models::{FeatureSnapshot, Side, Signal};

const SOCIAL_WEIGHT: f64 = 0.3;
const TECHNICAL_WEIGHT: f64 = 0.4;
const WHALE_WEIGHT: f64 = 0.3;

// The whale term carries an extra x20 multiplier so a handful of large
// on-chain moves can dominate the 0-100 sentiment/technical inputs. Known
// to disagree with "weights sum to 1"; load-bearing for expected outputs,
// do not change without product sign-off.
const WHALE_SCALE: f64 = 20.0;

const CONFIDENCE_FLOOR: u8 = 50;
const CONFIDENCE_CEILING: u8 = 95;

const BUY_REASONS: [&str; 4] = [
    "positive social media sentiment",
    "technical indicators point to an uptrend",
    "whale addresses are accumulating",
    "notable increase in trading volume",
];

const SELL_REASONS: [&str; 4] = [
    "social media sentiment turning negative",
    "technical indicators point to a downtrend",
    "whale addresses are distributing",
    "trading volume drying up",
];

/// Pure feature-snapshot -> signal policy.
///
/// Emits a signal only when the clamped confidence strictly exceeds the
/// emit threshold.
#[derive(Debug, Clone)]
pub struct SignalScorer {
    emit_threshold: u8,
}

impl Default for SignalScorer {
    fn default() -> Self {
        Self { emit_threshold: 70 }
    }
}

impl SignalScorer {
    pub fn new(emit_threshold: u8) -> Self {
        Self { emit_threshold }
    }

    pub fn score(&self, snapshot: &FeatureSnapshot) -> Option<Signal> {
        let confidence = Self::confidence(snapshot);
        if confidence <= self.emit_threshold {
            return None;
        }

        let side = if snapshot.social_sentiment > 60 {
            Side::Buy
        } else {
            Side::Sell
        };

        Some(Signal {
            asset: snapshot.asset.clone(),
            side,
            confidence,
            reason: Self::reason(snapshot, side).to_string(),
            price: snapshot.price,
            generated_at: Utc::now(),
        })
    }

    /// Weighted sum of the snapshot features, rounded and clamped to 50-95.
    pub fn confidence(snapshot: &FeatureSnapshot) -> u8 {
        let raw = f64::from(snapshot.social_sentiment) * SOCIAL_WEIGHT
            + f64::from(snapshot.technical_score) * TECHNICAL_WEIGHT
            + f64::from(snapshot.whale_activity) * WHALE_SCALE * WHALE_WEIGHT;

        raw.round()
            .clamp(f64::from(CONFIDENCE_FLOOR), f64::from(CONFIDENCE_CEILING)) as u8
    }

    // Priority order is a policy contract: ties resolve to the earliest
    // matching class.
    fn reason(snapshot: &FeatureSnapshot, side: Side) -> &'static str {
        let wording = match side {
            Side::Buy => &BUY_REASONS,
            Side::Sell => &SELL_REASONS,
        };

        if snapshot.social_sentiment > 70 {
            wording[0]
        } else if snapshot.technical_score > 70 {
            wording[1]
        } else if snapshot.whale_activity > 3 {
            wording[2]
        } else {
            wording[3]
        }
    }
}
