// tests/helpers.rs (shared test-only module)

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use keyhaus_common::models::{NewReward, Reward, User};
use keyhaus_core::Database;
use keyhaus_core::repositories::postgres::reward::{PostgresRewardRepository, RewardRepo};
use keyhaus_core::repositories::postgres::user::{UserRepo, UserRepository};

/// Creates a throwaway database on the cluster behind TEST_DATABASE_URL
/// and runs the migrations into it, so tests can run in parallel without
/// stepping on each other. Returns None when no cluster is reachable so
/// callers can skip instead of failing the suite on a box without
/// Postgres.
pub async fn fresh_test_pool() -> Option<Pool<Postgres>> {
    let base_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://keyhaus@localhost:5432/postgres".to_string());

    let admin = match PgPoolOptions::new()
        .max_connections(1)
        .connect(&base_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("skipping: cannot reach test database cluster ({e})");
            return None;
        }
    };

    let db_name = format!("keyhaus_test_{}", Uuid::new_v4().simple());
    sqlx::raw_sql(&format!(r#"CREATE DATABASE "{db_name}""#))
        .execute(&admin)
        .await
        .expect("failed to create test database");

    let (prefix, _) = base_url
        .rsplit_once('/')
        .expect("database url has no path segment");
    let url = format!("{prefix}/{db_name}");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to test database");

    Database::from_pool(pool.clone())
        .migrate()
        .await
        .expect("migrations failed");

    Some(pool)
}

pub async fn seed_user(pool: &Pool<Postgres>, discord_id: &str, balance: i32) -> User {
    let now = Utc::now();
    let user = User {
        user_id: Uuid::new_v4(),
        discord_id: discord_id.to_string(),
        username: format!("user-{discord_id}"),
        avatar_url: None,
        key_balance: balance,
        created_at: now,
        updated_at: now,
    };
    UserRepository::new(pool.clone())
        .create(&user)
        .await
        .expect("failed to seed user");
    user
}

pub async fn seed_reward(
    pool: &Pool<Postgres>,
    name: &str,
    key_cost: i32,
    is_active: bool,
    category_id: Option<i64>,
) -> Reward {
    PostgresRewardRepository::new(pool.clone())
        .create(&NewReward {
            category_id,
            name: name.to_string(),
            image_url: None,
            key_cost,
            is_active,
        })
        .await
        .expect("failed to seed reward")
}
