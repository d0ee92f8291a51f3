// src/services/redemption_service.rs

use std::sync::Arc;

use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;

use keyhaus_common::Error;
use keyhaus_common::models::{Reward, User};

use crate::notifier::RedemptionNotifier;

/// Outcome of a successful redemption.
#[derive(Debug, Clone)]
pub struct Redemption {
    pub reward: Reward,
    pub new_balance: i32,
}

/// The only writer of `users.key_balance`. Every check runs inside one
/// transaction; the balance debit and the log insert commit together or
/// not at all.
pub struct RedemptionService {
    pool: Pool<Postgres>,
    notifier: Option<Arc<RedemptionNotifier>>,
}

impl RedemptionService {
    pub fn new(pool: Pool<Postgres>, notifier: Option<Arc<RedemptionNotifier>>) -> Self {
        Self { pool, notifier }
    }

    pub async fn redeem(&self, user_id: Uuid, reward_id: i64) -> Result<Redemption, Error> {
        let mut tx = self.pool.begin().await?;

        // Lock the user row so two in-flight redemptions by the same user
        // debit serially instead of from a stale balance.
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, discord_id, username, avatar_url, key_balance,
                   created_at, updated_at
            FROM users
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(mut user) = user else {
            return Err(Error::UserNotFound);
        };

        let reward = sqlx::query_as::<_, Reward>(
            r#"
            SELECT reward_id, category_id, name, image_url, key_cost, is_active, created_at
            FROM rewards
            WHERE reward_id = $1 AND is_active = TRUE
            "#,
        )
            .bind(reward_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(reward) = reward else {
            return Err(Error::RewardNotFound);
        };

        let already: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM redemption_logs
                WHERE user_id = $1 AND reward_id = $2
            )
            "#,
        )
            .bind(user_id)
            .bind(reward_id)
            .fetch_one(&mut *tx)
            .await?;

        if already {
            return Err(Error::AlreadyRedeemed);
        }

        if user.key_balance < reward.key_cost {
            return Err(Error::InsufficientBalance {
                required: reward.key_cost,
                available: user.key_balance,
            });
        }

        let new_balance = user.key_balance - reward.key_cost;

        sqlx::query(
            r#"
            UPDATE users
            SET key_balance = $1,
                updated_at = NOW()
            WHERE user_id = $2
            "#,
        )
            .bind(new_balance)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::RedemptionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO redemption_logs (user_id, reward_id)
            VALUES ($1, $2)
            "#,
        )
            .bind(user_id)
            .bind(reward_id)
            .execute(&mut *tx)
            .await
            // The unique constraint on (user_id, reward_id) arbitrates the
            // concurrent-duplicate race; the losing writer lands here.
            .map_err(map_log_insert_error)?;

        tx.commit()
            .await
            .map_err(|e| Error::RedemptionFailed(e.to_string()))?;

        info!(
            "user {} redeemed '{}' for {} keys ({} left)",
            user_id, reward.name, reward.key_cost, new_balance
        );

        // Committed; the notification can no longer affect the outcome.
        if let Some(notifier) = &self.notifier {
            user.key_balance = new_balance;
            let notifier = Arc::clone(notifier);
            let reward = reward.clone();
            tokio::spawn(async move {
                notifier.notify_redemption(&user, &reward).await;
            });
        }

        Ok(Redemption {
            reward,
            new_balance,
        })
    }
}

fn map_log_insert_error(e: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("23505") {
            return Error::AlreadyRedeemed;
        }
    }
    Error::RedemptionFailed(e.to_string())
}
