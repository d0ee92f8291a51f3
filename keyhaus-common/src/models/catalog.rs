// File: keyhaus-common/src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Groups rewards on the dashboard. Deleting a category orphans its
/// rewards (the reference is nulled) rather than cascading.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// A catalog item purchasable with keys.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reward {
    pub reward_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub image_url: Option<String>,
    pub key_cost: i32,
    /// Inactive rewards disappear from the catalog but keep their
    /// redemption history.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a reward; the id and timestamp come from the database.
#[derive(Debug, Clone)]
pub struct NewReward {
    pub category_id: Option<i64>,
    pub name: String,
    pub image_url: Option<String>,
    pub key_cost: i32,
    pub is_active: bool,
}
