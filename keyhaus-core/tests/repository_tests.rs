// tests/repository_tests.rs

mod helpers;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use keyhaus_common::models::NewLeaderboardEntry;
use keyhaus_core::auth::DiscordProfile;
use keyhaus_core::repositories::postgres::category::{CategoryRepo, PostgresCategoryRepository};
use keyhaus_core::repositories::postgres::leaderboard::{
    LeaderboardRepo, PostgresLeaderboardRepository,
};
use keyhaus_core::repositories::postgres::redemption_log::{
    PostgresRedemptionLogRepository, RedemptionLogRepo,
};
use keyhaus_core::repositories::postgres::reward::{PostgresRewardRepository, RewardRepo};
use keyhaus_core::repositories::postgres::user::{UserRepo, UserRepository};
use keyhaus_core::services::UserService;
use std::sync::Arc;

#[tokio::test]
async fn test_user_repository() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    let repo = UserRepository::new(pool.clone());

    let user = helpers::seed_user(&pool, "111222333", 50).await;

    let retrieved = repo.get(user.user_id).await.unwrap().expect("user exists");
    assert_eq!(retrieved.discord_id, "111222333");
    assert_eq!(retrieved.key_balance, 50);

    let by_discord = repo
        .get_by_discord_id("111222333")
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(by_discord.user_id, user.user_id);

    let mut updated = retrieved.clone();
    updated.username = "renamed".to_string();
    updated.avatar_url = Some("https://cdn.discordapp.com/avatars/111222333/x.png".to_string());
    updated.updated_at = Utc::now();
    repo.update(&updated).await.unwrap();

    let retrieved = repo.get(user.user_id).await.unwrap().expect("user exists");
    assert_eq!(retrieved.username, "renamed");
    assert!(retrieved.avatar_url.is_some());

    let all = repo.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_category_repository() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    let repo = PostgresCategoryRepository::new(pool.clone());

    let games = repo.create("Games", "games", 1).await.unwrap();
    let merch = repo.create("Merch", "merch", 0).await.unwrap();

    let by_slug = repo.get_by_slug("games").await.unwrap().expect("exists");
    assert_eq!(by_slug.category_id, games.category_id);
    assert!(repo.get_by_slug("nope").await.unwrap().is_none());

    // list_all follows (sort_order, name).
    let all = repo.list_all().await.unwrap();
    assert_eq!(
        all.iter().map(|c| c.slug.as_str()).collect::<Vec<_>>(),
        vec!["merch", "games"]
    );

    let mut renamed = games.clone();
    renamed.name = "Game Keys".to_string();
    repo.update(&renamed).await.unwrap();
    let fetched = repo.get(games.category_id).await.unwrap().expect("exists");
    assert_eq!(fetched.name, "Game Keys");

    // Deleting a category orphans its rewards rather than deleting them.
    let reward = helpers::seed_reward(&pool, "Sticker", 5, true, Some(merch.category_id)).await;
    repo.delete(merch.category_id).await.unwrap();

    let reward_repo = PostgresRewardRepository::new(pool.clone());
    let orphaned = reward_repo
        .get(reward.reward_id)
        .await
        .unwrap()
        .expect("reward survives category deletion");
    assert_eq!(orphaned.category_id, None);
}

#[tokio::test]
async fn test_reward_repository() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    let repo = PostgresRewardRepository::new(pool.clone());

    let cheap = helpers::seed_reward(&pool, "Badge", 10, true, None).await;
    let _mid = helpers::seed_reward(&pool, "Art Print", 25, true, None).await;
    let hidden = helpers::seed_reward(&pool, "Retired", 5, false, None).await;

    assert!(repo.get(hidden.reward_id).await.unwrap().is_some());
    assert!(repo.get_active(hidden.reward_id).await.unwrap().is_none());
    assert!(repo.get_active(cheap.reward_id).await.unwrap().is_some());

    let active = repo.list_active(None).await.unwrap();
    assert_eq!(
        active.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["Badge", "Art Print"]
    );

    let mut deactivated = cheap.clone();
    deactivated.is_active = false;
    repo.update(&deactivated).await.unwrap();
    let active = repo.list_active(None).await.unwrap();
    assert_eq!(active.len(), 1);

    repo.delete(cheap.reward_id).await.unwrap();
    assert!(repo.get(cheap.reward_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_redemption_log_repository() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    let repo = PostgresRedemptionLogRepository::new(pool.clone());

    let user = helpers::seed_user(&pool, "444555666", 100).await;
    let reward_a = helpers::seed_reward(&pool, "A", 10, true, None).await;
    let reward_b = helpers::seed_reward(&pool, "B", 20, true, None).await;

    assert!(!repo.exists(user.user_id, reward_a.reward_id).await.unwrap());

    let log = repo.insert(user.user_id, reward_a.reward_id).await.unwrap();
    assert_eq!(log.user_id, user.user_id);
    assert!(repo.exists(user.user_id, reward_a.reward_id).await.unwrap());

    // The storage layer, not just application code, rejects a duplicate pair.
    assert!(repo.insert(user.user_id, reward_a.reward_id).await.is_err());

    repo.insert(user.user_id, reward_b.reward_id).await.unwrap();
    let mut ids = repo.redeemed_reward_ids(user.user_id).await.unwrap();
    ids.sort();
    assert_eq!(ids, vec![reward_a.reward_id, reward_b.reward_id]);

    let listed = repo.list_for_user(user.user_id, 10).await.unwrap();
    assert_eq!(listed.len(), 2);

    repo.delete(log.redemption_id).await.unwrap();
    assert!(!repo.exists(user.user_id, reward_a.reward_id).await.unwrap());
}

#[tokio::test]
async fn test_leaderboard_repository() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    let repo = PostgresLeaderboardRepository::new(pool.clone());

    let first = repo
        .create(&NewLeaderboardEntry {
            position: 1,
            username: "maow".to_string(),
            reward_won: "Gold Key".to_string(),
            date_won: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
            is_active: true,
            sort_order: 0,
        })
        .await
        .unwrap();
    let _retired = repo
        .create(&NewLeaderboardEntry {
            position: 2,
            username: "old-winner".to_string(),
            reward_won: "Silver Key".to_string(),
            date_won: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            is_active: false,
            sort_order: 0,
        })
        .await
        .unwrap();

    let active = repo.list_active(10).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].username, "maow");

    let all = repo.list_all().await.unwrap();
    assert_eq!(all.len(), 2);

    let mut promoted = first.clone();
    promoted.reward_won = "Platinum Key".to_string();
    repo.update(&promoted).await.unwrap();
    let active = repo.list_active(10).await.unwrap();
    assert_eq!(active[0].reward_won, "Platinum Key");

    repo.delete(first.entry_id).await.unwrap();
    assert!(repo.list_active(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_discord_user() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let service = UserService::new(Arc::clone(&user_repo));

    // First login creates the user with a zero balance.
    let profile = DiscordProfile {
        id: "777888999".to_string(),
        username: "kittyn".to_string(),
        avatar: Some("abc123".to_string()),
    };
    let created = service.sync_discord_user(&profile).await.unwrap();
    assert_eq!(created.key_balance, 0);
    assert_eq!(
        created.avatar_url.as_deref(),
        Some("https://cdn.discordapp.com/avatars/777888999/abc123.png")
    );

    // Grant some keys out of band.
    let mut funded = created.clone();
    funded.key_balance = 75;
    user_repo.update(&funded).await.unwrap();

    // Returning login refreshes the profile but not the balance, and does
    // not create a second row.
    let renamed = DiscordProfile {
        id: "777888999".to_string(),
        username: "kittyn_v2".to_string(),
        avatar: None,
    };
    let updated = service.sync_discord_user(&renamed).await.unwrap();
    assert_eq!(updated.user_id, created.user_id);
    assert_eq!(updated.username, "kittyn_v2");
    assert_eq!(updated.avatar_url, None);
    assert_eq!(updated.key_balance, 75);

    let all = user_repo.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_unknown_user_lookup() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    let repo = UserRepository::new(pool.clone());
    assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    assert!(repo.get_by_discord_id("ghost").await.unwrap().is_none());
}
