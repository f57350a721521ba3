use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use collectors::{BinanceFeatureSource, SimulatedFeatureSource};
use common::logger;
use common::traits::{FeatureSource, PersistenceSink, TradeExecutor};
use engine::{
    CycleRunner, Scheduler, SchedulerConfig, SignalScorer, SimulatorConfig, StatsAggregator,
    StopOutcome, TradeSimulator,
};
use storage::SqliteSink;

use crate::config::{BotConfig, FeatureSourceKind};

mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::setup_logger();
    dotenv().ok();

    let config = BotConfig::from_env();
    info!(
        "starting with {} assets, {:?} cycle interval",
        config.assets.len(),
        config.cycle_interval
    );

    let pool = storage::db::connect(&config.data_dir)
        .await
        .context("failed to open trading database")?;
    let sink: Arc<dyn PersistenceSink> = Arc::new(SqliteSink::new(pool));

    let source: Arc<dyn FeatureSource> = match config.feature_source {
        FeatureSourceKind::Simulated => {
            info!("using simulated feature source (seed {})", config.sim_seed);
            Arc::new(SimulatedFeatureSource::new(config.sim_seed))
        }
        FeatureSourceKind::Binance => {
            info!("using Binance 24h ticker feature source");
            Arc::new(BinanceFeatureSource::new())
        }
    };

    let executor: Arc<dyn TradeExecutor> = Arc::new(TradeSimulator::new(SimulatorConfig {
        seed: config.sim_seed,
        ..SimulatorConfig::default()
    }));

    let stats = Arc::new(StatsAggregator::new());
    let runner = Arc::new(CycleRunner::new(
        source,
        SignalScorer::default(),
        executor,
        sink,
        stats.clone(),
    ));

    let scheduler = Scheduler::new(
        runner,
        stats,
        config.assets.clone(),
        SchedulerConfig {
            cycle_interval: config.cycle_interval,
            stop_timeout: config.stop_timeout,
        },
    );

    scheduler.start()?;
    info!("bot running, press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    match scheduler.stop().await? {
        StopOutcome::Stopped => info!("engine stopped cleanly"),
        StopOutcome::TimedOut => warn!("engine stop timed out; loop task aborted"),
    }

    let status = scheduler.status();
    info!("final status: {}", serde_json::to_string(&status)?);
    Ok(())
}
