use async_trait::async_trait;

use crate::errors::{CollectionError, StorageError};
use crate::models::{ExecutionOutcome, FeatureSnapshot, Signal};

/// Supplies one feature snapshot per asset per cycle.
///
/// Implementations own their timeout behavior; the engine only assumes a
/// fetch eventually returns. At most one call is in flight from the engine
/// at a time.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn fetch(&self, asset: &str) -> Result<FeatureSnapshot, CollectionError>;
}

/// Record store for generated signals and executed trades.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn save_signal(&self, signal: &Signal) -> Result<(), StorageError>;

    async fn save_trade(
        &self,
        signal: &Signal,
        outcome: &ExecutionOutcome,
    ) -> Result<(), StorageError>;
}

/// Fills a decided signal, abstracting a real exchange.
///
/// Only invoked for signals whose confidence exceeds the execution
/// threshold.
pub trait TradeExecutor: Send + Sync {
    fn execute(&self, signal: &Signal) -> ExecutionOutcome;
}
