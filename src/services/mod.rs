//! Services module
//!
//! This module contains business logic services

pub mod activation;
pub mod notification;
pub mod payment;
pub mod referral;
pub mod user;
pub mod withdrawal;

// Re-export commonly used services
pub use activation::{ActivationService, ConfirmOutcome, UnlockOutcome};
pub use notification::NotificationService;
pub use payment::{CryptoPayClient, Invoice, InvoiceStatus, PaymentProvider};
pub use referral::ReferralEngine;
pub use user::{Registration, UserOverview, UserService};
pub use withdrawal::{BeginOutcome, SubmitOutcome, WithdrawalService, PROMPTED_BALANCE};

use std::sync::Arc;
use teloxide::Bot;
use crate::config::Settings;
use crate::database::LedgerStore;
use crate::i18n::I18n;
use crate::state::StateStorage;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub activation_service: ActivationService,
    pub withdrawal_service: WithdrawalService,
    pub notification_service: NotificationService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services sharing the injected ports
    pub fn new(
        bot: Bot,
        settings: &Settings,
        store: Arc<dyn LedgerStore>,
        payments: Arc<dyn PaymentProvider>,
        state: Arc<dyn StateStorage>,
        i18n: Arc<I18n>,
    ) -> Self {
        let user_service = UserService::new(store.clone(), settings.i18n.clone());
        let activation_service = ActivationService::from_settings(store.clone(), payments, settings);
        let withdrawal_service = WithdrawalService::from_settings(store, state, settings);
        let notification_service = NotificationService::new(
            bot,
            i18n,
            settings.bot.admin_id,
            settings.payment.asset.clone(),
        );

        Self {
            user_service,
            activation_service,
            withdrawal_service,
            notification_service,
        }
    }
}
