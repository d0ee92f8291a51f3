use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use keyhaus_common::Error;
use keyhaus_common::models::User;

use crate::auth::discord::{DiscordOAuth, DiscordProfile};
use crate::repositories::postgres::user::{UserRepo, UserRepository};

pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Looks up or creates the local user for a freshly fetched Discord
    /// profile. A returning user gets the new username and avatar; the
    /// key balance is never touched here.
    pub async fn sync_discord_user(&self, profile: &DiscordProfile) -> Result<User, Error> {
        let avatar_url = DiscordOAuth::avatar_url(&profile.id, profile.avatar.as_deref());

        if let Some(mut user) = self.user_repo.get_by_discord_id(&profile.id).await? {
            user.username = profile.username.clone();
            user.avatar_url = avatar_url;
            user.updated_at = Utc::now();
            self.user_repo.update(&user).await?;
            return Ok(user);
        }

        let now = Utc::now();
        let user = User {
            user_id: Uuid::new_v4(),
            discord_id: profile.id.clone(),
            username: profile.username.clone(),
            avatar_url,
            key_balance: 0,
            created_at: now,
            updated_at: now,
        };
        self.user_repo.create(&user).await?;
        info!(
            "created user {} for discord id {}",
            user.user_id, user.discord_id
        );
        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, Error> {
        self.user_repo.get(user_id).await
    }
}
