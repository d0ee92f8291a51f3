// src/repositories/postgres/reward.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use keyhaus_common::Error;
use keyhaus_common::models::{NewReward, Reward};

#[async_trait]
pub trait RewardRepo: Send + Sync {
    async fn create(&self, reward: &NewReward) -> Result<Reward, Error>;
    async fn get(&self, reward_id: i64) -> Result<Option<Reward>, Error>;
    /// Like `get`, but only returns rewards still visible in the catalog.
    async fn get_active(&self, reward_id: i64) -> Result<Option<Reward>, Error>;
    async fn update(&self, reward: &Reward) -> Result<(), Error>;
    async fn delete(&self, reward_id: i64) -> Result<(), Error>;
    async fn list_all(&self) -> Result<Vec<Reward>, Error>;
    /// Active rewards ordered by (key_cost, name), optionally restricted
    /// to one category.
    async fn list_active(&self, category_id: Option<i64>) -> Result<Vec<Reward>, Error>;
}

#[derive(Clone)]
pub struct PostgresRewardRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresRewardRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RewardRepo for PostgresRewardRepository {
    async fn create(&self, reward: &NewReward) -> Result<Reward, Error> {
        let created = sqlx::query_as::<_, Reward>(
            r#"
            INSERT INTO rewards (category_id, name, image_url, key_cost, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING reward_id, category_id, name, image_url, key_cost, is_active, created_at
            "#,
        )
            .bind(reward.category_id)
            .bind(&reward.name)
            .bind(&reward.image_url)
            .bind(reward.key_cost)
            .bind(reward.is_active)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get(&self, reward_id: i64) -> Result<Option<Reward>, Error> {
        let row = sqlx::query_as::<_, Reward>(
            r#"
            SELECT reward_id, category_id, name, image_url, key_cost, is_active, created_at
            FROM rewards
            WHERE reward_id = $1
            "#,
        )
            .bind(reward_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn get_active(&self, reward_id: i64) -> Result<Option<Reward>, Error> {
        let row = sqlx::query_as::<_, Reward>(
            r#"
            SELECT reward_id, category_id, name, image_url, key_cost, is_active, created_at
            FROM rewards
            WHERE reward_id = $1 AND is_active = TRUE
            "#,
        )
            .bind(reward_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, reward: &Reward) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE rewards
            SET category_id = $1,
                name = $2,
                image_url = $3,
                key_cost = $4,
                is_active = $5
            WHERE reward_id = $6
            "#,
        )
            .bind(reward.category_id)
            .bind(&reward.name)
            .bind(&reward.image_url)
            .bind(reward.key_cost)
            .bind(reward.is_active)
            .bind(reward.reward_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, reward_id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM rewards WHERE reward_id = $1")
            .bind(reward_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Reward>, Error> {
        let rows = sqlx::query_as::<_, Reward>(
            r#"
            SELECT reward_id, category_id, name, image_url, key_cost, is_active, created_at
            FROM rewards
            ORDER BY key_cost, name
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn list_active(&self, category_id: Option<i64>) -> Result<Vec<Reward>, Error> {
        let rows = match category_id {
            Some(cid) => {
                sqlx::query_as::<_, Reward>(
                    r#"
                    SELECT reward_id, category_id, name, image_url, key_cost, is_active, created_at
                    FROM rewards
                    WHERE is_active = TRUE AND category_id = $1
                    ORDER BY key_cost, name
                    "#,
                )
                    .bind(cid)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Reward>(
                    r#"
                    SELECT reward_id, category_id, name, image_url, key_cost, is_active, created_at
                    FROM rewards
                    WHERE is_active = TRUE
                    ORDER BY key_cost, name
                    "#,
                )
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows)
    }
}
