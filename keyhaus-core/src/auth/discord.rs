// src/auth/discord.rs

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

use keyhaus_common::Error;

const OAUTH_SCOPE: &str = "identify";
const AVATAR_CDN_BASE: &str = "https://cdn.discordapp.com/avatars";
// Discord gives no guidance here; a bounded timeout keeps a wedged
// provider from pinning login requests forever.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// What `/users/@me` returns for the `identify` scope. `avatar` is the
/// CDN hash, not a URL.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordProfile {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Server side of the three-legged OAuth exchange with Discord.
pub struct DiscordOAuth {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    api_base: String,
    http: ReqwestClient,
}

impl DiscordOAuth {
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        api_base: String,
    ) -> Result<Self, Error> {
        let http = ReqwestClient::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            api_base,
            http,
        })
    }

    /// Fresh anti-forgery token for one login attempt.
    pub fn generate_state() -> String {
        let mut buf = [0u8; 32];
        rand::rng().fill_bytes(&mut buf);
        URL_SAFE_NO_PAD.encode(buf)
    }

    pub fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}/oauth2/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.api_base,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(OAUTH_SCOPE),
            urlencoding::encode(state),
        )
    }

    /// Server-to-server exchange of the callback code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, Error> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let resp = self.http
            .post(format!("{}/oauth2/token", self.api_base))
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("error calling token endpoint: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Provider(format!(
                "token endpoint returned HTTP {}",
                resp.status()
            )));
        }

        let token = resp
            .json::<TokenResponse>()
            .await
            .map_err(|e| Error::Provider(format!("could not parse token response: {e}")))?;

        Ok(token.access_token)
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<DiscordProfile, Error> {
        let resp = self.http
            .get(format!("{}/users/@me", self.api_base))
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| Error::Provider(format!("error calling /users/@me: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::Provider(format!(
                "/users/@me returned HTTP {}",
                resp.status()
            )));
        }

        let profile = resp
            .json::<DiscordProfile>()
            .await
            .map_err(|e| Error::Provider(format!("could not parse profile: {e}")))?;

        debug!(
            "fetched Discord profile id={} username={}",
            profile.id, profile.username
        );
        Ok(profile)
    }

    /// CDN avatar URL for a profile, or None when Discord reported no
    /// avatar hash.
    pub fn avatar_url(discord_id: &str, avatar_hash: Option<&str>) -> Option<String> {
        avatar_hash.map(|hash| format!("{AVATAR_CDN_BASE}/{discord_id}/{hash}.png"))
    }
}
