// src/services/catalog_service.rs

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use keyhaus_common::Error;
use keyhaus_common::models::{Category, Reward};

use crate::repositories::postgres::category::{CategoryRepo, PostgresCategoryRepository};
use crate::repositories::postgres::redemption_log::{
    PostgresRedemptionLogRepository, RedemptionLogRepo,
};
use crate::repositories::postgres::reward::{PostgresRewardRepository, RewardRepo};

/// Read side of the dashboard: categories, filtered reward listings, and
/// the set of rewards a user has already claimed.
pub struct CatalogService {
    category_repo: Arc<PostgresCategoryRepository>,
    reward_repo: Arc<PostgresRewardRepository>,
    redemption_repo: Arc<PostgresRedemptionLogRepository>,
}

impl CatalogService {
    pub fn new(
        category_repo: Arc<PostgresCategoryRepository>,
        reward_repo: Arc<PostgresRewardRepository>,
        redemption_repo: Arc<PostgresRedemptionLogRepository>,
    ) -> Self {
        Self {
            category_repo,
            reward_repo,
            redemption_repo,
        }
    }

    /// Categories with at least one active reward, ordered (sort_order, name).
    pub async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.category_repo.list_with_active_rewards().await
    }

    /// A filter string resolves by id when numeric, by slug otherwise.
    /// Unknown filters resolve to None rather than an error.
    pub async fn resolve_category(&self, filter: &str) -> Result<Option<Category>, Error> {
        if let Ok(id) = filter.parse::<i64>() {
            self.category_repo.get(id).await
        } else {
            self.category_repo.get_by_slug(filter).await
        }
    }

    /// Active rewards ordered (key_cost, name). An unresolvable category
    /// filter is ignored and the full list comes back.
    pub async fn list_rewards(
        &self,
        category_filter: Option<&str>,
    ) -> Result<(Vec<Reward>, Option<Category>), Error> {
        let selected = match category_filter {
            Some(filter) => self.resolve_category(filter).await?,
            None => None,
        };

        let rewards = self
            .reward_repo
            .list_active(selected.as_ref().map(|c| c.category_id))
            .await?;

        Ok((rewards, selected))
    }

    /// Used by the presentation layer to suppress the redeem button; the
    /// redemption engine re-checks inside its transaction.
    pub async fn redeemed_reward_ids(&self, user_id: Uuid) -> Result<HashSet<i64>, Error> {
        let ids = self.redemption_repo.redeemed_reward_ids(user_id).await?;
        Ok(ids.into_iter().collect())
    }
}
