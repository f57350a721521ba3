use std::sync::Arc;

use tracing::{debug, error, info, warn};

use common::traits::{FeatureSource, PersistenceSink, TradeExecutor};

use crate::scorer::SignalScorer;
use crate::stats::StatsAggregator;

/// What happened during one pass over the tracked assets.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub assets_processed: usize,
    pub signals_generated: usize,
    pub trades_executed: usize,
    /// Per-asset fetch failures, recorded and skipped.
    pub failures: Vec<(String, String)>,
}

/// Runs one full decision cycle: collect, score, decide, simulate-execute,
/// persist, aggregate.
///
/// Per-asset failures are isolated: a failure on asset `i` never prevents
/// processing of asset `i+1`, and nothing here can abort the scheduler
/// loop.
pub struct CycleRunner {
    source: Arc<dyn FeatureSource>,
    scorer: SignalScorer,
    executor: Arc<dyn TradeExecutor>,
    sink: Arc<dyn PersistenceSink>,
    stats: Arc<StatsAggregator>,
    execution_threshold: u8,
}

impl CycleRunner {
    pub fn new(
        source: Arc<dyn FeatureSource>,
        scorer: SignalScorer,
        executor: Arc<dyn TradeExecutor>,
        sink: Arc<dyn PersistenceSink>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            source,
            scorer,
            executor,
            sink,
            stats,
            execution_threshold: 80,
        }
    }

    pub fn with_execution_threshold(mut self, threshold: u8) -> Self {
        self.execution_threshold = threshold;
        self
    }

    /// Processes the assets in caller order and reports the outcome.
    pub async fn run_cycle(&self, assets: &[String]) -> CycleReport {
        let mut report = CycleReport::default();

        for asset in assets {
            report.assets_processed += 1;

            let snapshot = match self.source.fetch(asset).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("skipping {asset}: {e}");
                    report.failures.push((asset.clone(), e.to_string()));
                    continue;
                }
            };

            let Some(signal) = self.scorer.score(&snapshot) else {
                debug!("no signal for {asset} this cycle");
                continue;
            };

            info!(
                "signal {} {} confidence={} ({})",
                signal.asset, signal.side, signal.confidence, signal.reason
            );
            report.signals_generated += 1;

            // Every emitted signal is persisted, traded or not.
            if let Err(e) = self.sink.save_signal(&signal).await {
                error!("failed to persist signal for {asset}: {e}");
            }

            if signal.confidence <= self.execution_threshold {
                continue;
            }

            let outcome = self.executor.execute(&signal);
            report.trades_executed += 1;

            if outcome.success {
                info!(
                    "trade filled: {} {} pnl={:.2}",
                    signal.asset, signal.side, outcome.profit_loss
                );
            } else {
                warn!(
                    "trade rejected: {} {} pnl={:.2}",
                    signal.asset, signal.side, outcome.profit_loss
                );
            }

            if let Err(e) = self.sink.save_trade(&signal, &outcome).await {
                error!("failed to persist trade for {asset}: {e}");
            }
            self.stats.record(&outcome);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::always;

    use common::errors::{CollectionError, StorageError};
    use common::models::{ExecutionOutcome, FeatureSnapshot, Signal};

    mock! {
        Executor {}

        impl TradeExecutor for Executor {
            fn execute(&self, signal: &Signal) -> ExecutionOutcome;
        }
    }

    /// Feature source scripted per asset: a snapshot or a simulated outage.
    struct ScriptedSource {
        snapshots: HashMap<String, FeatureSnapshot>,
    }

    #[async_trait]
    impl FeatureSource for ScriptedSource {
        async fn fetch(&self, asset: &str) -> Result<FeatureSnapshot, CollectionError> {
            self.snapshots
                .get(asset)
                .cloned()
                .ok_or_else(|| CollectionError::Http {
                    asset: asset.to_string(),
                    reason: "connection refused".to_string(),
                })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        signals: Mutex<Vec<Signal>>,
        trades: Mutex<Vec<(Signal, ExecutionOutcome)>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl PersistenceSink for RecordingSink {
        async fn save_signal(&self, signal: &Signal) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Write("disk full".to_string()));
            }
            self.signals.lock().unwrap().push(signal.clone());
            Ok(())
        }

        async fn save_trade(
            &self,
            signal: &Signal,
            outcome: &ExecutionOutcome,
        ) -> Result<(), StorageError> {
            if self.fail_writes {
                return Err(StorageError::Write("disk full".to_string()));
            }
            self.trades
                .lock()
                .unwrap()
                .push((signal.clone(), outcome.clone()));
            Ok(())
        }
    }

    fn snapshot(asset: &str, social: u8, technical: u8, whale: u32) -> FeatureSnapshot {
        FeatureSnapshot {
            asset: asset.to_string(),
            price: 0.000015,
            volume: 900_000.0,
            change_24h: 4.2,
            social_sentiment: social,
            whale_activity: whale,
            technical_score: technical,
        }
    }

    fn fill(profit_loss: f64) -> ExecutionOutcome {
        ExecutionOutcome {
            success: true,
            profit_loss,
            amount: 1000.0,
            executed_price: 0.000015,
        }
    }

    fn runner(
        snapshots: HashMap<String, FeatureSnapshot>,
        executor: MockExecutor,
        sink: Arc<RecordingSink>,
        stats: Arc<StatsAggregator>,
    ) -> CycleRunner {
        CycleRunner::new(
            Arc::new(ScriptedSource { snapshots }),
            SignalScorer::default(),
            Arc::new(executor),
            sink,
            stats,
        )
    }

    #[tokio::test]
    async fn one_failed_asset_does_not_stop_the_cycle() {
        // DOGE has no scripted snapshot, so its fetch fails; SHIB scores
        // 90*0.3 + 90*0.4 + 4*20*0.3 = 87 and trades.
        let mut snapshots = HashMap::new();
        snapshots.insert("SHIB".to_string(), snapshot("SHIB", 90, 90, 4));

        let mut executor = MockExecutor::new();
        executor
            .expect_execute()
            .with(always())
            .times(1)
            .returning(|_| fill(3.0));

        let sink = Arc::new(RecordingSink::default());
        let stats = Arc::new(StatsAggregator::new());
        let runner = runner(snapshots, executor, sink.clone(), stats.clone());

        let assets = vec!["DOGE".to_string(), "SHIB".to_string()];
        let report = runner.run_cycle(&assets).await;

        assert_eq!(report.assets_processed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "DOGE");
        assert_eq!(report.signals_generated, 1);
        assert_eq!(report.trades_executed, 1);
        assert_eq!(sink.signals.lock().unwrap().len(), 1);
        assert_eq!(stats.snapshot().total_trades, 1);
    }

    #[tokio::test]
    async fn mid_confidence_signal_is_persisted_but_never_executed() {
        // 80*0.3 + 80*0.4 + 3*20*0.3 = 74: above the emit threshold,
        // at or below the execution threshold.
        let mut snapshots = HashMap::new();
        snapshots.insert("PEPE".to_string(), snapshot("PEPE", 80, 80, 3));

        let mut executor = MockExecutor::new();
        executor.expect_execute().times(0);

        let sink = Arc::new(RecordingSink::default());
        let stats = Arc::new(StatsAggregator::new());
        let runner = runner(snapshots, executor, sink.clone(), stats.clone());

        let report = runner.run_cycle(&["PEPE".to_string()]).await;

        assert_eq!(report.signals_generated, 1);
        assert_eq!(report.trades_executed, 0);
        assert_eq!(sink.signals.lock().unwrap().len(), 1);
        assert!(sink.trades.lock().unwrap().is_empty());
        assert_eq!(stats.snapshot().total_trades, 0);
    }

    #[tokio::test]
    async fn low_confidence_snapshot_yields_nothing() {
        let mut snapshots = HashMap::new();
        snapshots.insert("BONK".to_string(), snapshot("BONK", 80, 50, 1));

        let mut executor = MockExecutor::new();
        executor.expect_execute().times(0);

        let sink = Arc::new(RecordingSink::default());
        let stats = Arc::new(StatsAggregator::new());
        let runner = runner(snapshots, executor, sink.clone(), stats.clone());

        let report = runner.run_cycle(&["BONK".to_string()]).await;

        assert_eq!(report.signals_generated, 0);
        assert!(sink.signals.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn storage_failures_are_swallowed_and_stats_still_update() {
        let mut snapshots = HashMap::new();
        snapshots.insert("FLOKI".to_string(), snapshot("FLOKI", 90, 90, 4));

        let mut executor = MockExecutor::new();
        executor.expect_execute().times(1).returning(|_| fill(2.0));

        let sink = Arc::new(RecordingSink {
            fail_writes: true,
            ..RecordingSink::default()
        });
        let stats = Arc::new(StatsAggregator::new());
        let runner = runner(snapshots, executor, sink, stats.clone());

        let report = runner.run_cycle(&["FLOKI".to_string()]).await;

        assert_eq!(report.trades_executed, 1);
        let recorded = stats.snapshot();
        assert_eq!(recorded.total_trades, 1);
        assert_eq!(recorded.total_profit, 2.0);
    }
}
