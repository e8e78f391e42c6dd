//! Database service layer
//!
//! Postgres adapter for the ledger store, built from the repositories.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;
use crate::database::{DatabasePool, LedgerStore, UserRepository, WithdrawRepository};
use crate::models::*;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub withdrawals: WithdrawRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            withdrawals: WithdrawRepository::new(pool),
        }
    }
}

#[async_trait]
impl LedgerStore for DatabaseService {
    async fn create_user(&self, request: CreateUserRequest) -> Result<bool> {
        let user_id = request.user_id;
        let inserted = self.users.create_if_absent(request).await?;
        debug!(user_id = user_id, inserted = inserted, "User upsert completed");
        Ok(inserted)
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        self.users.find_by_id(user_id).await
    }

    async fn add_balance(&self, user_id: i64, amount: Decimal) -> Result<()> {
        self.users.add_balance(user_id, amount).await
    }

    async fn save_invoice(&self, user_id: i64, invoice_id: i64) -> Result<()> {
        self.users.set_last_invoice(user_id, invoice_id).await
    }

    async fn commit_activation(&self, user_id: i64, payouts: &[Payout]) -> Result<bool> {
        self.users.activate_with_payouts(user_id, payouts).await
    }

    async fn commit_withdrawal(
        &self,
        request: NewWithdrawRequest,
        minimum: Decimal,
    ) -> Result<std::result::Result<WithdrawRequest, WithdrawRejection>> {
        self.withdrawals.commit(request, minimum).await
    }

    async fn referral_stats(&self, user_id: i64) -> Result<ReferralStats> {
        self.users.referral_stats(user_id).await
    }

    async fn withdrawals_for(&self, user_id: i64) -> Result<Vec<WithdrawRequest>> {
        self.withdrawals.find_by_user(user_id).await
    }
}
