use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use keyhaus_core::Database;
use keyhaus_core::config::AppConfig;

mod handlers;
mod render;
mod session;
mod state;

use state::AppState;

#[derive(Parser, Debug, Clone)]
#[command(name = "keyhaus")]
#[command(author, version, about = "keyhaus - Discord key rewards site")]
struct Args {
    /// Address the HTTP server binds to
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind_addr: String,

    /// Postgres connection URL
    #[arg(long, default_value = "postgres://keyhaus@localhost:5432/keyhaus")]
    db_url: String,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("keyhaus=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> Result<(), keyhaus_core::Error> {
    dotenv::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let config = AppConfig::from_env();
    if !config.oauth_configured() {
        error!("DISCORD_CLIENT_ID / DISCORD_CLIENT_SECRET not set; login is disabled.");
    }
    if config.admin_email.is_none() {
        info!("ADMIN_EMAIL not set; redemption notifications are disabled.");
    }

    let db = Database::new(&args.db_url).await?;
    db.migrate().await?;

    let state = Arc::new(AppState::new(&db, config)?);
    let app = handlers::router(state);

    let addr: SocketAddr = args
        .bind_addr
        .parse()
        .map_err(|e| keyhaus_core::Error::Config(format!("invalid bind address: {e}")))?;
    info!("keyhaus listening on http://{}", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
