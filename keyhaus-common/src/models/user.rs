use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A Discord user known to the site. Created on first login; the key
/// balance is only ever mutated by the redemption engine.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: Uuid,
    /// Stable external identity from Discord, stored as the opaque
    /// numeric string the API hands out.
    pub discord_id: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub key_balance: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
