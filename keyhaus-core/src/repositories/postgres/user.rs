// src/repositories/postgres/user.rs

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use keyhaus_common::Error;
use keyhaus_common::models::User;

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), Error>;
    async fn get(&self, user_id: Uuid) -> Result<Option<User>, Error>;
    async fn get_by_discord_id(&self, discord_id: &str) -> Result<Option<User>, Error>;
    async fn update(&self, user: &User) -> Result<(), Error>;
    async fn list_all(&self) -> Result<Vec<User>, Error>;
}

pub struct UserRepository {
    pub pool: Pool<Postgres>,
}

impl UserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepo for UserRepository {
    async fn create(&self, user: &User) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, discord_id, username, avatar_url, key_balance,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
            .bind(user.user_id)
            .bind(&user.discord_id)
            .bind(&user.username)
            .bind(&user.avatar_url)
            .bind(user.key_balance)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<User>, Error> {
        let row = sqlx::query(
            r#"
            SELECT user_id,
                   discord_id,
                   username,
                   avatar_url,
                   key_balance,
                   created_at,
                   updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row {
            Ok(Some(User {
                user_id: r.try_get("user_id")?,
                discord_id: r.try_get("discord_id")?,
                username: r.try_get("username")?,
                avatar_url: r.try_get("avatar_url")?,
                key_balance: r.try_get("key_balance")?,
                created_at: r.try_get::<DateTime<Utc>, _>("created_at")?,
                updated_at: r.try_get::<DateTime<Utc>, _>("updated_at")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn get_by_discord_id(&self, discord_id: &str) -> Result<Option<User>, Error> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, discord_id, username, avatar_url, key_balance,
                   created_at, updated_at
            FROM users
            WHERE discord_id = $1
            "#,
        )
            .bind(discord_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, user: &User) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = $1,
                avatar_url = $2,
                key_balance = $3,
                updated_at = $4
            WHERE user_id = $5
            "#,
        )
            .bind(&user.username)
            .bind(&user.avatar_url)
            .bind(user.key_balance)
            .bind(user.updated_at)
            .bind(user.user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, Error> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, discord_id, username, avatar_url, key_balance,
                   created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
