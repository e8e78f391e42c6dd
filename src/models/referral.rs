//! Referral payout and reporting models

use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

/// Depth of a referrer relative to the activating user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferralLevel {
    First,
    Second,
}

impl ReferralLevel {
    /// Ledger event name for a payout at this level
    pub fn event_name(&self) -> &'static str {
        match self {
            ReferralLevel::First => "referral_bonus_l1",
            ReferralLevel::Second => "referral_bonus_l2",
        }
    }
}

/// A single credit produced by an activation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub beneficiary: i64,
    pub level: ReferralLevel,
    pub amount: Decimal,
}

/// A referrer as seen from the activating user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referrer {
    pub user_id: i64,
    pub activated: bool,
}

/// Up to two levels of referrers above a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralChain {
    pub level1: Option<Referrer>,
    pub level2: Option<Referrer>,
}

/// Referral counters shown by the stats screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralStats {
    /// Direct referrals
    pub total: i64,
    /// Activated direct referrals
    pub active: i64,
    /// Activated referrals of direct referrals
    pub second: i64,
}
