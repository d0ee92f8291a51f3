use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row per (user, reward) pair, ever. The unique constraint on the
/// pair is what arbitrates concurrent duplicate redemption attempts.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RedemptionLog {
    pub redemption_id: i64,
    pub user_id: Uuid,
    pub reward_id: i64,
    pub redeemed_at: DateTime<Utc>,
}
