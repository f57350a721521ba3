use sqlx::SqlitePool;

use common::models::Signal;

pub struct SignalsRepository;

impl SignalsRepository {
    pub async fn insert(pool: &SqlitePool, signal: &Signal) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO trading_signals (coin, side, confidence, reason, price, source, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'AI', ?6)",
        )
        .bind(&signal.asset)
        .bind(signal.side.to_string())
        .bind(i64::from(signal.confidence))
        .bind(&signal.reason)
        .bind(signal.price)
        .bind(signal.generated_at.to_rfc3339())
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trading_signals")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
