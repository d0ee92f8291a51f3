// src/repositories/mod.rs

pub mod postgres;

pub use postgres::category::{CategoryRepo, PostgresCategoryRepository};
pub use postgres::leaderboard::{LeaderboardRepo, PostgresLeaderboardRepository};
pub use postgres::redemption_log::{PostgresRedemptionLogRepository, RedemptionLogRepo};
pub use postgres::reward::{PostgresRewardRepository, RewardRepo};
pub use postgres::user::{UserRepo, UserRepository};
