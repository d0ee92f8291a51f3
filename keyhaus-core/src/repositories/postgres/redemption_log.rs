use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use keyhaus_common::Error;
use keyhaus_common::models::RedemptionLog;

/// Repository for redemption logs. Rows are immutable; the only write
/// outside the redemption transaction is the administrative delete.
#[async_trait]
pub trait RedemptionLogRepo: Send + Sync {
    async fn insert(&self, user_id: Uuid, reward_id: i64) -> Result<RedemptionLog, Error>;
    async fn exists(&self, user_id: Uuid, reward_id: i64) -> Result<bool, Error>;
    async fn redeemed_reward_ids(&self, user_id: Uuid) -> Result<Vec<i64>, Error>;
    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<RedemptionLog>, Error>;
    async fn delete(&self, redemption_id: i64) -> Result<(), Error>;
}

#[derive(Clone)]
pub struct PostgresRedemptionLogRepository {
    pool: Pool<Postgres>,
}

impl PostgresRedemptionLogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RedemptionLogRepo for PostgresRedemptionLogRepository {
    async fn insert(&self, user_id: Uuid, reward_id: i64) -> Result<RedemptionLog, Error> {
        let log = sqlx::query_as::<_, RedemptionLog>(
            r#"
            INSERT INTO redemption_logs (user_id, reward_id)
            VALUES ($1, $2)
            RETURNING redemption_id, user_id, reward_id, redeemed_at
            "#,
        )
            .bind(user_id)
            .bind(reward_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(log)
    }

    async fn exists(&self, user_id: Uuid, reward_id: i64) -> Result<bool, Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM redemption_logs
                WHERE user_id = $1 AND reward_id = $2
            )
            "#,
        )
            .bind(user_id)
            .bind(reward_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn redeemed_reward_ids(&self, user_id: Uuid) -> Result<Vec<i64>, Error> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT reward_id FROM redemption_logs
            WHERE user_id = $1
            "#,
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<RedemptionLog>, Error> {
        let rows = sqlx::query_as::<_, RedemptionLog>(
            r#"
            SELECT redemption_id, user_id, reward_id, redeemed_at
            FROM redemption_logs
            WHERE user_id = $1
            ORDER BY redeemed_at DESC
            LIMIT $2
            "#,
        )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn delete(&self, redemption_id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM redemption_logs WHERE redemption_id = $1")
            .bind(redemption_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
