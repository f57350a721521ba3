use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{info, warn};

use common::models::StatusReport;

use crate::cycle::CycleRunner;
use crate::stats::StatsAggregator;

/// Caller misuse of the lifecycle, surfaced as a typed result.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("engine is already running")]
    AlreadyRunning,

    #[error("engine is not running")]
    NotRunning,
}

/// How a stop request concluded. `TimedOut` is a warning, not a failure:
/// the state is Stopped either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub cycle_interval: Duration,
    pub stop_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_secs(30),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

struct LifecycleState {
    running: bool,
    started_at: Option<DateTime<Utc>>,
    stop_tx: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

/// Owns the periodic decision loop: start/stop/status.
///
/// The loop runs in its own tokio task; all lifecycle state sits behind an
/// internal mutex that is only ever held for field copies, so status
/// queries and stop requests are never serialized behind a running cycle.
pub struct Scheduler {
    runner: Arc<CycleRunner>,
    stats: Arc<StatsAggregator>,
    assets: Vec<String>,
    config: SchedulerConfig,
    state: Mutex<LifecycleState>,
}

impl Scheduler {
    pub fn new(
        runner: Arc<CycleRunner>,
        stats: Arc<StatsAggregator>,
        assets: Vec<String>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            runner,
            stats,
            assets,
            config,
            state: Mutex::new(LifecycleState {
                running: false,
                started_at: None,
                stop_tx: None,
                handle: None,
            }),
        }
    }

    /// Spawns the loop task. Errors with `AlreadyRunning` on a second call
    /// and leaves `started_at` untouched.
    pub fn start(&self) -> Result<(), LifecycleError> {
        let mut state = self.state.lock().expect("lifecycle lock poisoned");
        if state.running {
            warn!("start requested while already running");
            return Err(LifecycleError::AlreadyRunning);
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            self.runner.clone(),
            self.assets.clone(),
            self.config.cycle_interval,
            stop_rx,
        ));

        state.running = true;
        state.started_at = Some(Utc::now());
        state.stop_tx = Some(stop_tx);
        state.handle = Some(handle);

        info!("trading engine started");
        Ok(())
    }

    /// Signals the loop to terminate and waits up to the configured
    /// timeout for it to exit. The in-flight cycle always finishes; the
    /// stop is observed at the inter-cycle wait. State is forced to
    /// Stopped even when the loop misses the deadline.
    pub async fn stop(&self) -> Result<StopOutcome, LifecycleError> {
        let (stop_tx, handle) = {
            let mut state = self.state.lock().expect("lifecycle lock poisoned");
            if !state.running {
                warn!("stop requested while not running");
                return Err(LifecycleError::NotRunning);
            }
            state.running = false;
            (state.stop_tx.take(), state.handle.take())
        };

        if let Some(tx) = stop_tx {
            let _ = tx.send(true);
        }

        let Some(handle) = handle else {
            return Ok(StopOutcome::Stopped);
        };

        let abort = handle.abort_handle();
        match time::timeout(self.config.stop_timeout, handle).await {
            Ok(_) => {
                info!("trading engine stopped");
                Ok(StopOutcome::Stopped)
            }
            Err(_) => {
                warn!(
                    "loop did not exit within {:?}; aborting task",
                    self.config.stop_timeout
                );
                abort.abort();
                Ok(StopOutcome::TimedOut)
            }
        }
    }

    /// Race-free snapshot for external observers. Never blocks on a cycle
    /// in progress.
    pub fn status(&self) -> StatusReport {
        let (running, started_at) = {
            let state = self.state.lock().expect("lifecycle lock poisoned");
            (state.running, state.started_at)
        };

        let runtime_seconds = match (running, started_at) {
            (true, Some(started)) => (Utc::now() - started).num_seconds(),
            _ => 0,
        };

        StatusReport {
            running,
            start_time: started_at,
            runtime_seconds,
            stats: self.stats.snapshot(),
        }
    }
}

async fn run_loop(
    runner: Arc<CycleRunner>,
    assets: Vec<String>,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    info!("decision loop started for {} assets", assets.len());

    loop {
        let report = runner.run_cycle(&assets).await;
        info!(
            "cycle complete: {} assets, {} signals, {} trades, {} failures",
            report.assets_processed,
            report.signals_generated,
            report.trades_executed,
            report.failures.len()
        );

        // A stop observed during the wait ends the loop before the next
        // cycle starts, never mid-cycle.
        tokio::select! {
            _ = time::sleep(interval) => {}
            _ = stop_rx.changed() => break,
        }
        if *stop_rx.borrow() {
            break;
        }
    }

    info!("decision loop ended");
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use common::errors::{CollectionError, StorageError};
    use common::models::{ExecutionOutcome, FeatureSnapshot, Signal};
    use common::traits::{FeatureSource, PersistenceSink, TradeExecutor};

    use crate::scorer::SignalScorer;

    /// Counts fetches and always yields a snapshot too weak to signal.
    struct CountingSource {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl FeatureSource for CountingSource {
        async fn fetch(&self, asset: &str) -> Result<FeatureSnapshot, CollectionError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(FeatureSnapshot {
                asset: asset.to_string(),
                price: 0.00001,
                volume: 600_000.0,
                change_24h: 0.0,
                social_sentiment: 10,
                whale_activity: 0,
                technical_score: 10,
            })
        }
    }

    struct NullSink;

    #[async_trait]
    impl PersistenceSink for NullSink {
        async fn save_signal(&self, _signal: &Signal) -> Result<(), StorageError> {
            Ok(())
        }

        async fn save_trade(
            &self,
            _signal: &Signal,
            _outcome: &ExecutionOutcome,
        ) -> Result<(), StorageError> {
            Ok(())
        }
    }

    struct NoopExecutor;

    impl TradeExecutor for NoopExecutor {
        fn execute(&self, signal: &Signal) -> ExecutionOutcome {
            ExecutionOutcome {
                success: true,
                profit_loss: 1.0,
                amount: 1000.0,
                executed_price: signal.price,
            }
        }
    }

    fn scheduler_with_counter(interval: Duration) -> (Arc<Scheduler>, Arc<CountingSource>) {
        let source = Arc::new(CountingSource {
            fetches: AtomicUsize::new(0),
        });
        let stats = Arc::new(StatsAggregator::new());
        let runner = Arc::new(CycleRunner::new(
            source.clone(),
            SignalScorer::default(),
            Arc::new(NoopExecutor),
            Arc::new(NullSink),
            stats.clone(),
        ));
        let scheduler = Scheduler::new(
            runner,
            stats,
            vec!["DOGE".to_string(), "SHIB".to_string()],
            SchedulerConfig {
                cycle_interval: interval,
                stop_timeout: Duration::from_secs(5),
            },
        );
        (Arc::new(scheduler), source)
    }

    #[tokio::test]
    async fn second_start_is_rejected_and_keeps_started_at() {
        let (scheduler, _) = scheduler_with_counter(Duration::from_secs(60));

        scheduler.start().unwrap();
        let first = scheduler.status().start_time;

        assert_eq!(scheduler.start(), Err(LifecycleError::AlreadyRunning));
        assert_eq!(scheduler.status().start_time, first);

        scheduler.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_on_a_stopped_engine_is_not_running() {
        let (scheduler, _) = scheduler_with_counter(Duration::from_secs(60));

        assert_eq!(scheduler.stop().await, Err(LifecycleError::NotRunning));
        let status = scheduler.status();
        assert!(!status.running);
        assert_eq!(status.stats.total_trades, 0);
    }

    #[tokio::test]
    async fn stop_during_the_wait_prevents_the_next_cycle() {
        let (scheduler, source) = scheduler_with_counter(Duration::from_secs(60));

        scheduler.start().unwrap();
        // Let the first cycle finish and the loop park on its wait.
        time::sleep(Duration::from_millis(100)).await;

        assert_eq!(scheduler.stop().await, Ok(StopOutcome::Stopped));

        // Exactly one cycle over two assets.
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
        assert!(!scheduler.status().running);
    }

    #[tokio::test]
    async fn status_reports_runtime_while_running_and_zero_after() {
        let (scheduler, _) = scheduler_with_counter(Duration::from_secs(60));

        let idle = scheduler.status();
        assert!(!idle.running);
        assert_eq!(idle.start_time, None);
        assert_eq!(idle.runtime_seconds, 0);

        scheduler.start().unwrap();
        let live = scheduler.status();
        assert!(live.running);
        assert!(live.start_time.is_some());
        assert!(live.runtime_seconds >= 0);

        scheduler.stop().await.unwrap();
        let stopped = scheduler.status();
        assert!(!stopped.running);
        // Last start time is retained for the report.
        assert!(stopped.start_time.is_some());
        assert_eq!(stopped.runtime_seconds, 0);
    }

    #[tokio::test]
    async fn restart_after_stop_records_a_new_start_time() {
        let (scheduler, _) = scheduler_with_counter(Duration::from_secs(60));

        scheduler.start().unwrap();
        let first = scheduler.status().start_time;
        scheduler.stop().await.unwrap();

        time::sleep(Duration::from_millis(10)).await;

        scheduler.start().unwrap();
        let second = scheduler.status().start_time;
        assert!(second > first);
        scheduler.stop().await.unwrap();
    }
}
