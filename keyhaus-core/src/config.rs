// src/config.rs

use std::env;

/// Environment-driven settings. The server binary loads `.env` first via
/// dotenv, then reads these once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_client_id: Option<String>,
    pub discord_client_secret: Option<String>,
    pub discord_redirect_uri: String,
    pub discord_api_base: String,
    /// Redemption notifications go here; unset disables them (logged only).
    pub admin_email: Option<String>,
    pub from_email: String,
    pub smtp_relay: Option<String>,
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            discord_client_id: env_opt("DISCORD_CLIENT_ID"),
            discord_client_secret: env_opt("DISCORD_CLIENT_SECRET"),
            discord_redirect_uri: env_opt("DISCORD_REDIRECT_URI")
                .unwrap_or_else(|| "http://localhost:8000/auth/callback".to_string()),
            discord_api_base: env_opt("DISCORD_API_BASE_URL")
                .unwrap_or_else(|| "https://discord.com/api".to_string()),
            admin_email: env_opt("ADMIN_EMAIL"),
            from_email: env_opt("FROM_EMAIL")
                .unwrap_or_else(|| "noreply@localhost".to_string()),
            smtp_relay: env_opt("SMTP_RELAY"),
        }
    }

    /// Login is disabled entirely when either credential is missing.
    pub fn oauth_configured(&self) -> bool {
        self.discord_client_id.is_some() && self.discord_client_secret.is_some()
    }
}
