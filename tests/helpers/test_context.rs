//! Test context setup
//!
//! Wires the services over in-memory adapters so flows can be driven end to
//! end without Postgres, Redis or the payment API.

use std::sync::Arc;
use rust_decimal::Decimal;
use ReferralBot::config::Settings;
use ReferralBot::database::{InMemoryLedgerStore, LedgerStore};
use ReferralBot::services::{
    ActivationService, ConfirmOutcome, UnlockOutcome, UserService, WithdrawalService,
};
use ReferralBot::state::{InMemoryStateStorage, StateStorage};
use super::payment_mock::ScriptedPaymentProvider;

/// Settings with test credentials and the stock ledger constants
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = "12345:test_token".to_string();
    settings.bot.admin_id = 999;
    settings.payment.token = "test_pay_token".to_string();
    settings
}

pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub struct TestContext {
    pub settings: Settings,
    pub store: Arc<dyn LedgerStore>,
    pub payments: Arc<ScriptedPaymentProvider>,
    pub state: Arc<InMemoryStateStorage>,
    pub users: UserService,
    pub activation: ActivationService,
    pub withdrawal: WithdrawalService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::with_store(settings, Arc::new(InMemoryLedgerStore::new()))
    }

    pub fn with_store(settings: Settings, store: Arc<dyn LedgerStore>) -> Self {
        let payments = Arc::new(ScriptedPaymentProvider::new());
        let state = Arc::new(InMemoryStateStorage::new());

        let users = UserService::new(store.clone(), settings.i18n.clone());
        let activation = ActivationService::from_settings(store.clone(), payments.clone(), &settings);
        let state_port: Arc<dyn StateStorage> = state.clone();
        let withdrawal = WithdrawalService::from_settings(store.clone(), state_port, &settings);

        Self {
            settings,
            store,
            payments,
            state,
            users,
            activation,
            withdrawal,
        }
    }

    pub async fn register(&self, user_id: i64, referrer: Option<i64>) {
        self.users.register(user_id, referrer, Some("en")).await.unwrap();
    }

    /// Issue an invoice, pay it and confirm it
    pub async fn activate(&self, user_id: i64) -> ConfirmOutcome {
        let invoice_id = self.issue_invoice(user_id).await;
        self.payments.mark_paid(invoice_id);
        self.activation.confirm_payment(user_id).await.unwrap()
    }

    pub async fn issue_invoice(&self, user_id: i64) -> i64 {
        match self.activation.request_unlock(user_id).await.unwrap() {
            UnlockOutcome::InvoiceIssued { invoice_id, .. } => invoice_id,
            UnlockOutcome::AlreadyActive => panic!("user {} is already active", user_id),
        }
    }

    pub async fn balance(&self, user_id: i64) -> Decimal {
        self.store.balance(user_id).await.unwrap()
    }
}
