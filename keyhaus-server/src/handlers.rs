// keyhaus-server/src/handlers.rs
//
// One handler per route; session context is passed explicitly rather
// than living in any ambient request state.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use keyhaus_common::Error;
use keyhaus_common::models::User;
use keyhaus_core::repositories::postgres::leaderboard::LeaderboardRepo;

use crate::render;
use crate::session::{clear_session_cookie, session_cookie};
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/auth/login", get(login))
        .route("/auth/callback", get(callback))
        .route("/dashboard", get(dashboard))
        .route("/logout", get(logout))
        .route("/api/redeem/{reward_id}", post(redeem))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    category: Option<String>,
}

/// Attach the session cookie when the session was created this request.
fn with_session_cookie(resp: impl IntoResponse, session_id: &str, fresh: bool) -> Response {
    if fresh {
        (
            AppendHeaders([(header::SET_COOKIE, session_cookie(session_id))]),
            resp,
        )
            .into_response()
    } else {
        resp.into_response()
    }
}

async fn landing(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (session_id, fresh) = state.sessions.resolve(&headers);
    let flash = state.sessions.take_flash(&session_id);
    let logged_in = state
        .sessions
        .get(&headers)
        .is_some_and(|(_, s)| s.user_id.is_some());

    let leaderboard = match state.leaderboard.list_active(10).await {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to load leaderboard: {e}");
            Vec::new()
        }
    };

    let page = render::landing_page(
        &leaderboard,
        flash.as_deref(),
        logged_in,
        state.config.oauth_configured(),
    );
    with_session_cookie(Html(page), &session_id, fresh)
}

async fn login(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (session_id, fresh) = state.sessions.resolve(&headers);

    let Some(oauth) = &state.oauth else {
        state.sessions.set_flash(
            &session_id,
            "Discord OAuth not configured. Please set DISCORD_CLIENT_ID and DISCORD_CLIENT_SECRET.",
        );
        return with_session_cookie(Redirect::to("/"), &session_id, fresh);
    };

    let csrf_state = keyhaus_core::auth::DiscordOAuth::generate_state();
    state
        .sessions
        .set_oauth_state(&session_id, csrf_state.clone());

    with_session_cookie(
        Redirect::to(&oauth.authorize_url(&csrf_state)),
        &session_id,
        fresh,
    )
}

async fn callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Response {
    let (session_id, fresh) = state.sessions.resolve(&headers);

    match complete_login(&state, &session_id, query).await {
        Ok(user) => {
            info!("{} logged in", user.username);
            with_session_cookie(Redirect::to("/dashboard"), &session_id, fresh)
        }
        Err(e) => {
            warn!("Login failed: {e}");
            state
                .sessions
                .set_flash(&session_id, login_error_message(&e));
            with_session_cookie(Redirect::to("/"), &session_id, fresh)
        }
    }
}

async fn complete_login(
    state: &AppState,
    session_id: &str,
    query: CallbackQuery,
) -> Result<User, Error> {
    let oauth = state
        .oauth
        .as_ref()
        .ok_or_else(|| Error::Config("Discord OAuth not configured".to_string()))?;

    // The stored token is gone after this, whatever the outcome.
    let stored = state.sessions.take_oauth_state(session_id);
    verify_state(query.state.as_deref(), stored.as_deref())?;

    let code = query.code.ok_or(Error::MissingCode)?;

    let access_token = oauth.exchange_code(&code).await?;
    let profile = oauth.fetch_profile(&access_token).await?;
    let user = state.users.sync_discord_user(&profile).await?;

    state
        .sessions
        .set_identity(session_id, user.user_id, user.discord_id.clone());
    Ok(user)
}

fn verify_state(returned: Option<&str>, stored: Option<&str>) -> Result<(), Error> {
    match (returned, stored) {
        (Some(returned), Some(stored)) if returned == stored => Ok(()),
        _ => Err(Error::StateMismatch),
    }
}

fn login_error_message(e: &Error) -> String {
    match e {
        Error::StateMismatch => "Invalid OAuth state. Please try again.".to_string(),
        Error::MissingCode => "Authorization failed. Please try again.".to_string(),
        Error::Provider(_) => format!("Discord authentication failed: {e}"),
        _ => format!("Login failed: {e}"),
    }
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
) -> Response {
    let Some((session_id, session)) = state.sessions.get(&headers) else {
        return Redirect::to("/").into_response();
    };
    let Some(user_id) = session.user_id else {
        return Redirect::to("/").into_response();
    };

    let user = match state.users.get_user(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            // Session points at a user that no longer exists.
            state.sessions.remove(&session_id);
            return (
                AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
                Redirect::to("/"),
            )
                .into_response();
        }
        Err(e) => {
            error!("Failed to load user {user_id}: {e}");
            return server_error_page();
        }
    };

    let page = async {
        let categories = state.catalog.list_categories().await?;
        let (rewards, selected) = state.catalog.list_rewards(query.category.as_deref()).await?;
        let redeemed = state.catalog.redeemed_reward_ids(user.user_id).await?;
        let leaderboard = state.leaderboard.list_active(10).await?;
        Ok::<_, Error>(render::dashboard_page(
            &user,
            &categories,
            selected.as_ref(),
            &rewards,
            &redeemed,
            &leaderboard,
        ))
    }
    .await;

    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render dashboard: {e}");
            server_error_page()
        }
    }
}

async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some((session_id, _)) = state.sessions.get(&headers) {
        state.sessions.remove(&session_id);
    }

    // Fresh session whose only job is carrying the goodbye flash.
    let session_id = state.sessions.create();
    state
        .sessions
        .set_flash(&session_id, "You have been logged out.");

    (
        AppendHeaders([(header::SET_COOKIE, session_cookie(&session_id))]),
        Redirect::to("/"),
    )
        .into_response()
}

async fn redeem(
    State(state): State<Arc<AppState>>,
    Path(reward_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let identity = state.sessions.get(&headers).and_then(|(_, s)| s.user_id);
    let Some(user_id) = identity else {
        return api_error(StatusCode::UNAUTHORIZED, "Not authenticated");
    };

    match state.redemptions.redeem(user_id, reward_id).await {
        Ok(redemption) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": format!("Successfully redeemed {}!", redemption.reward.name),
                "new_balance": redemption.new_balance,
            })),
        )
            .into_response(),
        Err(e) => redemption_error(&e),
    }
}

fn api_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

fn redemption_error(e: &Error) -> Response {
    match e {
        Error::UserNotFound => api_error(StatusCode::NOT_FOUND, "User not found"),
        Error::RewardNotFound => api_error(StatusCode::NOT_FOUND, "Reward not found"),
        Error::AlreadyRedeemed => api_error(
            StatusCode::BAD_REQUEST,
            "You have already redeemed this reward. Each reward can only be redeemed once.",
        ),
        Error::InsufficientBalance {
            required,
            available,
        } => api_error(
            StatusCode::BAD_REQUEST,
            &format!("Insufficient keys. You need {required} keys but have {available}."),
        ),
        other => {
            error!("Redemption failed: {other}");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Redemption failed: {other}"),
            )
        }
    }
}

fn server_error_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render::error_page()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redemption_errors_map_to_the_documented_statuses() {
        assert_eq!(
            redemption_error(&Error::UserNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            redemption_error(&Error::RewardNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            redemption_error(&Error::AlreadyRedeemed).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            redemption_error(&Error::InsufficientBalance {
                required: 70,
                available: 60
            })
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            redemption_error(&Error::RedemptionFailed("boom".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn callback_state_must_match_the_stored_token() {
        assert!(verify_state(Some("tok"), Some("tok")).is_ok());
        // Missing on either side, or any difference, ends the flow.
        assert!(matches!(
            verify_state(Some("tok"), Some("other")),
            Err(Error::StateMismatch)
        ));
        assert!(matches!(
            verify_state(None, Some("tok")),
            Err(Error::StateMismatch)
        ));
        assert!(matches!(
            verify_state(Some("tok"), None),
            Err(Error::StateMismatch)
        ));
        assert!(matches!(verify_state(None, None), Err(Error::StateMismatch)));
    }

    #[test]
    fn insufficient_balance_reports_both_amounts() {
        let message = login_error_message(&Error::StateMismatch);
        assert_eq!(message, "Invalid OAuth state. Please try again.");

        let e = Error::InsufficientBalance {
            required: 70,
            available: 60,
        };
        assert_eq!(e.to_string(), "Insufficient keys: need 70, have 60");
    }
}
