use std::env;
use std::time::Duration;

const DEFAULT_ASSETS: &str = "DOGE,SHIB,PEPE,FLOKI,BONK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSourceKind {
    Simulated,
    Binance,
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub data_dir: String,
    pub assets: Vec<String>,
    pub cycle_interval: Duration,
    pub stop_timeout: Duration,
    pub feature_source: FeatureSourceKind,
    pub sim_seed: u64,
}

impl BotConfig {
    pub fn from_env() -> Self {
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let assets = parse_assets(
            &env::var("ASSETS").unwrap_or_else(|_| DEFAULT_ASSETS.to_string()),
        );

        let cycle_interval = Duration::from_secs(
            env::var("CYCLE_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        );

        let stop_timeout = Duration::from_secs(
            env::var("STOP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        );

        let feature_source = match env::var("FEATURE_SOURCE").as_deref() {
            Ok("binance") => FeatureSourceKind::Binance,
            _ => FeatureSourceKind::Simulated,
        };

        let sim_seed = env::var("SIM_SEED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Self {
            data_dir,
            assets,
            cycle_interval,
            stop_timeout,
            feature_source,
            sim_seed,
        }
    }
}

fn parse_assets(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
