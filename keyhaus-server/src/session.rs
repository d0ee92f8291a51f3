// keyhaus-server/src/session.rs

use axum::http::{HeaderMap, header};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dashmap::DashMap;
use rand::RngCore;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "keyhaus_session";

/// Per-browser state. The OAuth state token is single-use: `take_oauth_state`
/// removes it no matter how the callback turns out.
#[derive(Debug, Default, Clone)]
pub struct Session {
    pub user_id: Option<Uuid>,
    pub discord_id: Option<String>,
    pub oauth_state: Option<String>,
    flash: Option<String>,
}

/// In-memory session store keyed by the cookie token. Nothing here is
/// durable; restarting the server logs everyone out.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    fn new_session_id() -> String {
        let mut buf = [0u8; 32];
        rand::rng().fill_bytes(&mut buf);
        URL_SAFE_NO_PAD.encode(buf)
    }

    /// The id from the cookie when the store still knows it, otherwise a
    /// fresh session. The bool says whether a Set-Cookie is needed.
    pub fn resolve(&self, headers: &HeaderMap) -> (String, bool) {
        if let Some(id) = cookie_value(headers, SESSION_COOKIE) {
            if self.sessions.contains_key(&id) {
                return (id, false);
            }
        }
        let id = Self::new_session_id();
        self.sessions.insert(id.clone(), Session::default());
        (id, true)
    }

    /// The existing session for this request, if any.
    pub fn get(&self, headers: &HeaderMap) -> Option<(String, Session)> {
        let id = cookie_value(headers, SESSION_COOKIE)?;
        let session = self.sessions.get(&id)?.clone();
        Some((id, session))
    }

    pub fn set_oauth_state(&self, id: &str, state: String) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.oauth_state = Some(state);
        }
    }

    pub fn take_oauth_state(&self, id: &str) -> Option<String> {
        self.sessions.get_mut(id)?.oauth_state.take()
    }

    pub fn set_identity(&self, id: &str, user_id: Uuid, discord_id: String) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.user_id = Some(user_id);
            session.discord_id = Some(discord_id);
        }
    }

    pub fn set_flash(&self, id: &str, message: impl Into<String>) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.flash = Some(message.into());
        }
    }

    pub fn take_flash(&self, id: &str) -> Option<String> {
        self.sessions.get_mut(id)?.flash.take()
    }

    pub fn remove(&self, id: &str) {
        self.sessions.remove(id);
    }

    /// Fresh empty session, for when there is no usable request cookie.
    pub fn create(&self) -> String {
        let id = Self::new_session_id();
        self.sessions.insert(id.clone(), Session::default());
        id
    }
}

/// Set-Cookie value for a session id.
pub fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Set-Cookie value that expires the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=deleted; Path=/; HttpOnly; Max-Age=0")
}

pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in raw.split(';') {
        let part = part.trim();
        if let Some(rest) = part.strip_prefix(name) {
            if let Some(value) = rest.strip_prefix('=') {
                return Some(value.to_string());
            }
        }
    }
    None
}
