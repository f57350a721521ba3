use sqlx::SqlitePool;
use uuid::Uuid;

use common::models::{ExecutionOutcome, Signal};

pub struct TradesRepository;

impl TradesRepository {
    pub async fn insert(
        pool: &SqlitePool,
        signal: &Signal,
        outcome: &ExecutionOutcome,
    ) -> Result<(), sqlx::Error> {
        let total_value = outcome.amount * outcome.executed_price;
        let profit_loss_pct = if total_value != 0.0 {
            outcome.profit_loss / total_value * 100.0
        } else {
            0.0
        };

        sqlx::query(
            "INSERT INTO trading_history
                 (symbol, side, amount, price, total_value, profit_loss,
                  profit_loss_pct, status, order_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'COMPLETED', ?8, ?9)",
        )
        .bind(format!("{}/USDT", signal.asset))
        .bind(signal.side.to_string())
        .bind(outcome.amount)
        .bind(outcome.executed_price)
        .bind(total_value)
        .bind(outcome.profit_loss)
        .bind(profit_loss_pct)
        .bind(format!("ORDER_{}", Uuid::new_v4().simple()))
        .bind(signal.generated_at.to_rfc3339())
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trading_history")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
