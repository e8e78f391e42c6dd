//! ReferralBot Telegram Bot
//!
//! A Telegram bot that sells one-time access through a crypto payment
//! provider and pays a two-level referral bonus on every activation.
//! This library provides the ledger store, the activation and withdrawal
//! flows, conversation state and the teloxide handlers wiring them to chat.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod state;
pub mod i18n;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ReferralBotError, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, InMemoryLedgerStore, LedgerStore};
pub use services::ServiceFactory;
pub use state::{StateStorage, RedisStateStorage, InMemoryStateStorage};
pub use i18n::I18n;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
