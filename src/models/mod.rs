//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod withdraw;
pub mod referral;

// Re-export commonly used models
pub use user::{User, CreateUserRequest};
pub use withdraw::{WithdrawRequest, NewWithdrawRequest, WithdrawStatus, WithdrawRejection, check_eligibility};
pub use referral::{Payout, ReferralChain, ReferralLevel, ReferralStats, Referrer};
