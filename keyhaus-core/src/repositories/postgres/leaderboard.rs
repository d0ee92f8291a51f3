// src/repositories/postgres/leaderboard.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use keyhaus_common::Error;
use keyhaus_common::models::{LeaderboardEntry, NewLeaderboardEntry};

/// Fully administrator-curated; no joins against live user or reward data.
#[async_trait]
pub trait LeaderboardRepo: Send + Sync {
    async fn create(&self, entry: &NewLeaderboardEntry) -> Result<LeaderboardEntry, Error>;
    async fn update(&self, entry: &LeaderboardEntry) -> Result<(), Error>;
    async fn delete(&self, entry_id: i64) -> Result<(), Error>;
    async fn list_all(&self) -> Result<Vec<LeaderboardEntry>, Error>;
    async fn list_active(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, Error>;
}

#[derive(Clone)]
pub struct PostgresLeaderboardRepository {
    pool: Pool<Postgres>,
}

impl PostgresLeaderboardRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaderboardRepo for PostgresLeaderboardRepository {
    async fn create(&self, entry: &NewLeaderboardEntry) -> Result<LeaderboardEntry, Error> {
        let created = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            INSERT INTO leaderboard_entries (
                position, username, reward_won, date_won, is_active, sort_order
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING entry_id, position, username, reward_won, date_won,
                      is_active, sort_order, created_at
            "#,
        )
            .bind(entry.position)
            .bind(&entry.username)
            .bind(&entry.reward_won)
            .bind(entry.date_won)
            .bind(entry.is_active)
            .bind(entry.sort_order)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update(&self, entry: &LeaderboardEntry) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE leaderboard_entries
            SET position = $1,
                username = $2,
                reward_won = $3,
                date_won = $4,
                is_active = $5,
                sort_order = $6
            WHERE entry_id = $7
            "#,
        )
            .bind(entry.position)
            .bind(&entry.username)
            .bind(&entry.reward_won)
            .bind(entry.date_won)
            .bind(entry.is_active)
            .bind(entry.sort_order)
            .bind(entry.entry_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, entry_id: i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM leaderboard_entries WHERE entry_id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<LeaderboardEntry>, Error> {
        let rows = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT entry_id, position, username, reward_won, date_won,
                   is_active, sort_order, created_at
            FROM leaderboard_entries
            ORDER BY sort_order, position
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn list_active(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, Error> {
        let rows = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT entry_id, position, username, reward_won, date_won,
                   is_active, sort_order, created_at
            FROM leaderboard_entries
            WHERE is_active = TRUE
            ORDER BY sort_order, position
            LIMIT $1
            "#,
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
