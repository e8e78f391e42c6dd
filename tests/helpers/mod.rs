//! Test helpers module
//!
//! Scripted payment provider, mock Telegram API, Postgres test database and
//! a context wiring the services over in-memory adapters.

#![allow(dead_code)]

pub mod database_helper;
pub mod payment_mock;
pub mod telegram_mock;
pub mod test_context;

pub use database_helper::*;
pub use payment_mock::*;
pub use telegram_mock::*;
pub use test_context::*;
