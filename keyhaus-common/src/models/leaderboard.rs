// File: keyhaus-common/src/models/leaderboard.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A curated past winner shown on the landing page and dashboard.
/// Deliberately free of foreign keys so old entries survive any later
/// changes to the user or reward tables.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaderboardEntry {
    pub entry_id: i64,
    pub position: i32,
    pub username: String,
    pub reward_won: String,
    pub date_won: NaiveDate,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a leaderboard entry.
#[derive(Debug, Clone)]
pub struct NewLeaderboardEntry {
    pub position: i32,
    pub username: String,
    pub reward_won: String,
    pub date_won: NaiveDate,
    pub is_active: bool,
    pub sort_order: i32,
}
