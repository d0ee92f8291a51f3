// keyhaus-common/src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Infrastructure:
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    // OAuth flow:
    #[error("OAuth state mismatch")]
    StateMismatch,

    #[error("No authorization code in callback")]
    MissingCode,

    #[error("Identity provider error: {0}")]
    Provider(String),

    // Redemption:
    #[error("User not found")]
    UserNotFound,

    #[error("Reward not found")]
    RewardNotFound,

    #[error("Reward already redeemed")]
    AlreadyRedeemed,

    #[error("Insufficient keys: need {required}, have {available}")]
    InsufficientBalance { required: i32, available: i32 },

    #[error("Redemption failed: {0}")]
    RedemptionFailed(String),

    // Always swallowed by the notifier; never reaches a handler.
    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}
