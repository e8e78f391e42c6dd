//! In-memory ledger store
//!
//! Same semantics as the Postgres adapter, including the atomicity of
//! activation and withdrawal commits, held behind a single mutex.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use crate::database::LedgerStore;
use crate::models::withdraw::check_eligibility;
use crate::models::*;
use crate::utils::errors::{ReferralBotError, Result};

#[derive(Debug, Default)]
struct Ledger {
    users: HashMap<i64, User>,
    withdrawals: Vec<WithdrawRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    inner: Arc<Mutex<Ledger>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>> {
        self.inner
            .lock()
            .map_err(|_| ReferralBotError::InvalidInput("ledger lock poisoned".to_string()))
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn create_user(&self, request: CreateUserRequest) -> Result<bool> {
        let mut ledger = self.lock()?;
        if ledger.users.contains_key(&request.user_id) {
            return Ok(false);
        }

        ledger.users.insert(
            request.user_id,
            User {
                user_id: request.user_id,
                referrer_id: request.referrer_id,
                activated: false,
                balance: Decimal::ZERO,
                last_invoice_id: None,
                language_code: request.language_code.unwrap_or_else(|| "en".to_string()),
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        Ok(self.lock()?.users.get(&user_id).cloned())
    }

    async fn add_balance(&self, user_id: i64, amount: Decimal) -> Result<()> {
        if let Some(user) = self.lock()?.users.get_mut(&user_id) {
            user.balance += amount;
        }
        Ok(())
    }

    async fn save_invoice(&self, user_id: i64, invoice_id: i64) -> Result<()> {
        if let Some(user) = self.lock()?.users.get_mut(&user_id) {
            user.last_invoice_id = Some(invoice_id);
        }
        Ok(())
    }

    async fn commit_activation(&self, user_id: i64, payouts: &[Payout]) -> Result<bool> {
        let mut ledger = self.lock()?;

        match ledger.users.get_mut(&user_id) {
            Some(user) if !user.activated => user.activated = true,
            _ => return Ok(false),
        }

        for payout in payouts {
            if let Some(beneficiary) = ledger.users.get_mut(&payout.beneficiary) {
                beneficiary.balance += payout.amount;
            }
        }
        Ok(true)
    }

    async fn commit_withdrawal(
        &self,
        request: NewWithdrawRequest,
        minimum: Decimal,
    ) -> Result<std::result::Result<WithdrawRequest, WithdrawRejection>> {
        let mut ledger = self.lock()?;
        let next_id = ledger.withdrawals.len() as i64 + 1;

        let Some(user) = ledger.users.get_mut(&request.user_id) else {
            return Ok(Err(WithdrawRejection::UnknownUser));
        };

        if let Err(rejection) = check_eligibility(user.balance, user.activated, minimum) {
            return Ok(Err(rejection));
        }

        let recorded = WithdrawRequest {
            id: next_id,
            user_id: request.user_id,
            amount: user.balance,
            address: request.address,
            memo: request.memo,
            status: WithdrawStatus::Pending.as_str().to_string(),
            created_at: Utc::now(),
        };
        user.balance = Decimal::ZERO;
        ledger.withdrawals.push(recorded.clone());

        Ok(Ok(recorded))
    }

    async fn referral_stats(&self, user_id: i64) -> Result<ReferralStats> {
        let ledger = self.lock()?;

        let direct: Vec<&User> = ledger
            .users
            .values()
            .filter(|u| u.referrer_id == Some(user_id))
            .collect();
        let active_ids: Vec<i64> = direct.iter().filter(|u| u.activated).map(|u| u.user_id).collect();
        let second = ledger
            .users
            .values()
            .filter(|u| u.activated && u.referrer_id.map_or(false, |r| active_ids.contains(&r)))
            .count();

        Ok(ReferralStats {
            total: direct.len() as i64,
            active: active_ids.len() as i64,
            second: second as i64,
        })
    }

    async fn withdrawals_for(&self, user_id: i64) -> Result<Vec<WithdrawRequest>> {
        let ledger = self.lock()?;
        let mut requests: Vec<WithdrawRequest> = ledger
            .withdrawals
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(requests)
    }
}
