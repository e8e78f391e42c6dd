//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod withdraw;

// Re-export repositories
pub use user::UserRepository;
pub use withdraw::WithdrawRepository;
