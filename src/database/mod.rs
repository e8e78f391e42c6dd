//! Database module
//!
//! This module handles database connections, the ledger store port and its
//! adapters

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations, health_check};
pub use memory::InMemoryLedgerStore;
pub use repositories::{UserRepository, WithdrawRepository};
pub use service::DatabaseService;
pub use store::LedgerStore;
