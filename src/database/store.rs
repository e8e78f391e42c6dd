//! Ledger store port
//!
//! Flows receive an `Arc<dyn LedgerStore>` instead of reaching for a global
//! connection. `DatabaseService` is the Postgres adapter; `InMemoryLedgerStore`
//! backs tests and dry runs.

use async_trait::async_trait;
use rust_decimal::Decimal;
use crate::models::{
    CreateUserRequest, NewWithdrawRequest, Payout, ReferralChain, ReferralStats, Referrer, User,
    WithdrawRejection, WithdrawRequest,
};
use crate::utils::errors::Result;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Insert a user if absent. Returns true when a new row was created;
    /// re-contact never touches the existing row.
    async fn create_user(&self, request: CreateUserRequest) -> Result<bool>;

    async fn find_user(&self, user_id: i64) -> Result<Option<User>>;

    /// Additive balance increment
    async fn add_balance(&self, user_id: i64, amount: Decimal) -> Result<()>;

    /// Overwrite the stored invoice reference
    async fn save_invoice(&self, user_id: i64, invoice_id: i64) -> Result<()>;

    /// Flip `activated` and apply `payouts` atomically.
    ///
    /// Returns false and applies nothing if the user is already activated.
    async fn commit_activation(&self, user_id: i64, payouts: &[Payout]) -> Result<bool>;

    /// Record a pending withdrawal of the full balance and zero the balance,
    /// re-checking the thresholds against the committed state.
    async fn commit_withdrawal(
        &self,
        request: NewWithdrawRequest,
        minimum: Decimal,
    ) -> Result<std::result::Result<WithdrawRequest, WithdrawRejection>>;

    async fn referral_stats(&self, user_id: i64) -> Result<ReferralStats>;

    async fn withdrawals_for(&self, user_id: i64) -> Result<Vec<WithdrawRequest>>;

    async fn balance(&self, user_id: i64) -> Result<Decimal> {
        Ok(self.find_user(user_id).await?.map(|u| u.balance).unwrap_or_default())
    }

    async fn is_activated(&self, user_id: i64) -> Result<bool> {
        Ok(self.find_user(user_id).await?.map(|u| u.activated).unwrap_or(false))
    }

    async fn referrer_of(&self, user_id: i64) -> Result<Option<i64>> {
        Ok(self.find_user(user_id).await?.and_then(|u| u.referrer_id))
    }

    async fn last_invoice(&self, user_id: i64) -> Result<Option<i64>> {
        Ok(self.find_user(user_id).await?.and_then(|u| u.last_invoice_id))
    }

    /// Resolve up to two referrers above `user_id`
    ///
    /// A referrer id that does not resolve to a stored user, or that loops
    /// back to `user_id`, counts as absent.
    async fn referral_chain(&self, user_id: i64) -> Result<ReferralChain> {
        let mut chain = ReferralChain::default();

        let Some(level1_id) = self.referrer_of(user_id).await?.filter(|id| *id != user_id) else {
            return Ok(chain);
        };
        let Some(level1) = self.find_user(level1_id).await? else {
            return Ok(chain);
        };
        chain.level1 = Some(Referrer { user_id: level1.user_id, activated: level1.activated });

        if let Some(level2_id) = level1.referrer_id.filter(|id| *id != user_id) {
            if let Some(level2) = self.find_user(level2_id).await? {
                chain.level2 = Some(Referrer { user_id: level2.user_id, activated: level2.activated });
            }
        }

        Ok(chain)
    }
}
