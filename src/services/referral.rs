//! Referral engine
//!
//! Pure payout computation for an activation. Applying the payouts is the
//! ledger store's job, in the same commit as the activation flag flip.

use rust_decimal::Decimal;
use crate::config::LedgerConfig;
use crate::models::{Payout, ReferralChain, ReferralLevel, Referrer};

#[derive(Debug, Clone, PartialEq)]
pub struct ReferralEngine {
    level1_bonus: Decimal,
    level2_bonus: Decimal,
    require_active_referrer: bool,
}

impl ReferralEngine {
    pub fn new(level1_bonus: Decimal, level2_bonus: Decimal, require_active_referrer: bool) -> Self {
        Self {
            level1_bonus,
            level2_bonus,
            require_active_referrer,
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.level1_bonus, config.level2_bonus, config.require_active_referrer)
    }

    /// Payouts owed when the user at the bottom of `chain` activates
    ///
    /// Level 2 is only considered when level 1 exists; nothing beyond two
    /// levels is ever paid.
    pub fn payouts(&self, chain: &ReferralChain) -> Vec<Payout> {
        let mut payouts = Vec::with_capacity(2);

        let Some(level1) = chain.level1 else {
            return payouts;
        };
        if self.is_eligible(&level1) {
            payouts.push(Payout {
                beneficiary: level1.user_id,
                level: ReferralLevel::First,
                amount: self.level1_bonus,
            });
        }

        if let Some(level2) = chain.level2 {
            if self.is_eligible(&level2) {
                payouts.push(Payout {
                    beneficiary: level2.user_id,
                    level: ReferralLevel::Second,
                    amount: self.level2_bonus,
                });
            }
        }

        payouts
    }

    fn is_eligible(&self, referrer: &Referrer) -> bool {
        !self.require_active_referrer || referrer.activated
    }
}
