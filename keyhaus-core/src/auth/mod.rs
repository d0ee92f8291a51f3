// src/auth/mod.rs

pub mod discord;

pub use discord::{DiscordOAuth, DiscordProfile};
