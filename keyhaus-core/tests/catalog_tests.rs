// tests/catalog_tests.rs

mod helpers;

use std::sync::Arc;

use keyhaus_core::repositories::postgres::category::{CategoryRepo, PostgresCategoryRepository};
use keyhaus_core::repositories::postgres::redemption_log::{
    PostgresRedemptionLogRepository, RedemptionLogRepo,
};
use keyhaus_core::repositories::postgres::reward::PostgresRewardRepository;
use keyhaus_core::services::CatalogService;

async fn catalog(pool: &sqlx::Pool<sqlx::Postgres>) -> CatalogService {
    CatalogService::new(
        Arc::new(PostgresCategoryRepository::new(pool.clone())),
        Arc::new(PostgresRewardRepository::new(pool.clone())),
        Arc::new(PostgresRedemptionLogRepository::new(pool.clone())),
    )
}

#[tokio::test]
async fn categories_need_at_least_one_active_reward() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    let categories = PostgresCategoryRepository::new(pool.clone());

    let games = categories.create("Games", "games", 1).await.unwrap();
    let merch = categories.create("Merch", "merch", 0).await.unwrap();
    let _empty = categories.create("Empty", "empty", 2).await.unwrap();

    // games has two active rewards (must not appear twice), merch only an
    // inactive one, empty none at all.
    helpers::seed_reward(&pool, "Key A", 10, true, Some(games.category_id)).await;
    helpers::seed_reward(&pool, "Key B", 20, true, Some(games.category_id)).await;
    helpers::seed_reward(&pool, "Old Shirt", 30, false, Some(merch.category_id)).await;

    let listed = catalog(&pool).await.list_categories().await.unwrap();
    assert_eq!(
        listed.iter().map(|c| c.slug.as_str()).collect::<Vec<_>>(),
        vec!["games"]
    );
}

#[tokio::test]
async fn rewards_filter_by_id_or_slug() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    let categories = PostgresCategoryRepository::new(pool.clone());
    let games = categories.create("Games", "games", 0).await.unwrap();

    helpers::seed_reward(&pool, "Steam Key", 40, true, Some(games.category_id)).await;
    helpers::seed_reward(&pool, "Sticker", 5, true, None).await;

    let service = catalog(&pool).await;

    let (by_slug, selected) = service.list_rewards(Some("games")).await.unwrap();
    assert_eq!(by_slug.len(), 1);
    assert_eq!(by_slug[0].name, "Steam Key");
    assert_eq!(
        selected.map(|c| c.category_id),
        Some(games.category_id)
    );

    let (by_id, _) = service
        .list_rewards(Some(&games.category_id.to_string()))
        .await
        .unwrap();
    assert_eq!(by_id.len(), 1);
}

#[tokio::test]
async fn unknown_filter_returns_the_full_list() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    helpers::seed_reward(&pool, "Sticker", 5, true, None).await;
    helpers::seed_reward(&pool, "Badge", 10, true, None).await;

    let service = catalog(&pool).await;

    // A slug nobody knows falls back to the unfiltered list, not an
    // empty one and not an error.
    let (rewards, selected) = service.list_rewards(Some("no-such-slug")).await.unwrap();
    assert_eq!(rewards.len(), 2);
    assert!(selected.is_none());

    let (rewards, selected) = service.list_rewards(Some("987654")).await.unwrap();
    assert_eq!(rewards.len(), 2);
    assert!(selected.is_none());
}

#[tokio::test]
async fn rewards_come_back_cheapest_first() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    helpers::seed_reward(&pool, "Zeta", 10, true, None).await;
    helpers::seed_reward(&pool, "Alpha", 10, true, None).await;
    helpers::seed_reward(&pool, "Pricey", 90, true, None).await;
    helpers::seed_reward(&pool, "Hidden", 1, false, None).await;

    let (rewards, _) = catalog(&pool).await.list_rewards(None).await.unwrap();
    assert_eq!(
        rewards.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["Alpha", "Zeta", "Pricey"]
    );
}

#[tokio::test]
async fn redeemed_ids_only_cover_the_requesting_user() {
    let Some(pool) = helpers::fresh_test_pool().await else {
        return;
    };
    let logs = PostgresRedemptionLogRepository::new(pool.clone());

    let alice = helpers::seed_user(&pool, "1001", 100).await;
    let bob = helpers::seed_user(&pool, "1002", 100).await;
    let reward_a = helpers::seed_reward(&pool, "A", 10, true, None).await;
    let reward_b = helpers::seed_reward(&pool, "B", 20, true, None).await;

    logs.insert(alice.user_id, reward_a.reward_id).await.unwrap();
    logs.insert(bob.user_id, reward_b.reward_id).await.unwrap();

    let service = catalog(&pool).await;
    let redeemed = service.redeemed_reward_ids(alice.user_id).await.unwrap();
    assert!(redeemed.contains(&reward_a.reward_id));
    assert!(!redeemed.contains(&reward_b.reward_id));
    assert_eq!(redeemed.len(), 1);
}
