//! Notification backends.

pub mod discord;

pub use discord::{DiscordNotifier, build_embed};
