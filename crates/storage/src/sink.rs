use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use common::errors::StorageError;
use common::models::{ExecutionOutcome, Signal};
use common::traits::PersistenceSink;

use crate::repositories::{SignalsRepository, TradesRepository};

/// SQLite-backed record store for signals and executed trades.
pub struct SqliteSink {
    pool: SqlitePool,
}

impl SqliteSink {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersistenceSink for SqliteSink {
    async fn save_signal(&self, signal: &Signal) -> Result<(), StorageError> {
        SignalsRepository::insert(&self.pool, signal)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;
        debug!("persisted signal for {}", signal.asset);
        Ok(())
    }

    async fn save_trade(
        &self,
        signal: &Signal,
        outcome: &ExecutionOutcome,
    ) -> Result<(), StorageError> {
        TradesRepository::insert(&self.pool, signal, outcome)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;
        debug!("persisted trade for {}", signal.asset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use common::models::Side;

    use crate::db::connect_in_memory;

    fn signal() -> Signal {
        Signal {
            asset: "DOGE".to_string(),
            side: Side::Buy,
            confidence: 85,
            reason: "positive social media sentiment".to_string(),
            price: 0.000013,
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn signal_round_trips_into_the_signals_table() {
        let pool = connect_in_memory().await.unwrap();
        let sink = SqliteSink::new(pool.clone());

        sink.save_signal(&signal()).await.unwrap();

        assert_eq!(SignalsRepository::count(&pool).await.unwrap(), 1);
        assert_eq!(TradesRepository::count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn trade_lands_in_the_history_table() {
        let pool = connect_in_memory().await.unwrap();
        let sink = SqliteSink::new(pool.clone());

        let outcome = ExecutionOutcome {
            success: true,
            profit_loss: 4.2,
            amount: 1000.0,
            executed_price: 0.000013,
        };
        sink.save_trade(&signal(), &outcome).await.unwrap();

        assert_eq!(TradesRepository::count(&pool).await.unwrap(), 1);
    }
}
