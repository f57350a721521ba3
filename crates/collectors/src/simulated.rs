use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::errors::CollectionError;
use common::models::FeatureSnapshot;
use common::traits::FeatureSource;

/// Seeded stand-in feature source for offline runs and tests.
///
/// Value ranges mirror what live meme-coin sources produce: dust-level
/// prices, six-figure volumes, single-digit whale counts.
pub struct SimulatedFeatureSource {
    rng: Mutex<StdRng>,
}

impl SimulatedFeatureSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl FeatureSource for SimulatedFeatureSource {
    async fn fetch(&self, asset: &str) -> Result<FeatureSnapshot, CollectionError> {
        let mut rng = self.rng.lock().expect("simulated source rng lock poisoned");

        Ok(FeatureSnapshot {
            asset: asset.to_string(),
            price: 0.00001 + f64::from(rng.gen_range(0..1000u32)) / 100_000_000.0,
            volume: f64::from(rng.gen_range(500_000..1_500_000u32)),
            change_24h: f64::from(rng.gen_range(-100..100i32)) / 10.0,
            social_sentiment: rng.gen_range(0..100u8),
            whale_activity: rng.gen_range(0..5u32),
            technical_score: rng.gen_range(0..100u8),
        })
    }
}
