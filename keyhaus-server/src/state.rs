// keyhaus-server/src/state.rs

use std::sync::Arc;

use keyhaus_common::Error;
use keyhaus_core::Database;
use keyhaus_core::auth::DiscordOAuth;
use keyhaus_core::config::AppConfig;
use keyhaus_core::notifier::RedemptionNotifier;
use keyhaus_core::repositories::postgres::{
    PostgresCategoryRepository, PostgresLeaderboardRepository, PostgresRedemptionLogRepository,
    PostgresRewardRepository, UserRepository,
};
use keyhaus_core::services::{CatalogService, RedemptionService, UserService};

use crate::session::SessionStore;

/// Everything the handlers share. Built once at startup.
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    /// None when OAuth credentials are missing; login is disabled then.
    pub oauth: Option<DiscordOAuth>,
    pub users: UserService,
    pub catalog: CatalogService,
    pub redemptions: RedemptionService,
    pub leaderboard: Arc<PostgresLeaderboardRepository>,
}

impl AppState {
    pub fn new(db: &Database, config: AppConfig) -> Result<Self, Error> {
        let pool = db.pool().clone();

        let user_repo = Arc::new(UserRepository::new(pool.clone()));
        let category_repo = Arc::new(PostgresCategoryRepository::new(pool.clone()));
        let reward_repo = Arc::new(PostgresRewardRepository::new(pool.clone()));
        let redemption_repo = Arc::new(PostgresRedemptionLogRepository::new(pool.clone()));
        let leaderboard = Arc::new(PostgresLeaderboardRepository::new(pool.clone()));

        let oauth = match (&config.discord_client_id, &config.discord_client_secret) {
            (Some(id), Some(secret)) => Some(DiscordOAuth::new(
                id.clone(),
                secret.clone(),
                config.discord_redirect_uri.clone(),
                config.discord_api_base.clone(),
            )?),
            _ => None,
        };

        let notifier = Arc::new(RedemptionNotifier::new(
            config.admin_email.clone(),
            config.from_email.clone(),
            config.smtp_relay.clone(),
        ));

        Ok(Self {
            sessions: SessionStore::new(),
            oauth,
            users: UserService::new(Arc::clone(&user_repo)),
            catalog: CatalogService::new(category_repo, reward_repo, redemption_repo),
            redemptions: RedemptionService::new(pool, Some(notifier)),
            leaderboard,
            config,
        })
    }
}
