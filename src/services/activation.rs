//! Activation flow
//!
//! Drives a user from an issued invoice to the activated flag. The only
//! persisted intermediate state is the last invoice reference on the user row;
//! the provider's invoice status gates the final transition.

use std::sync::Arc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use crate::config::Settings;
use crate::database::LedgerStore;
use crate::models::Payout;
use crate::services::payment::PaymentProvider;
use crate::services::referral::ReferralEngine;
use crate::utils::errors::{PaymentError, ReferralBotError, Result};
use crate::utils::logging::{log_api_error, log_ledger_event, log_user_action};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    AlreadyActive,
    InvoiceIssued { invoice_id: i64, pay_url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// No invoice stored, provider does not know it, it is not paid, or the
    /// provider could not be reached
    NotReceived,
    /// First confirmation; `payouts` were credited in the same commit
    Activated { payouts: Vec<Payout> },
    AlreadyActive,
}

#[derive(Clone)]
pub struct ActivationService {
    store: Arc<dyn LedgerStore>,
    payments: Arc<dyn PaymentProvider>,
    engine: ReferralEngine,
    price: Decimal,
    asset: String,
}

impl ActivationService {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        payments: Arc<dyn PaymentProvider>,
        engine: ReferralEngine,
        price: Decimal,
        asset: impl Into<String>,
    ) -> Self {
        Self {
            store,
            payments,
            engine,
            price,
            asset: asset.into(),
        }
    }

    pub fn from_settings(
        store: Arc<dyn LedgerStore>,
        payments: Arc<dyn PaymentProvider>,
        settings: &Settings,
    ) -> Self {
        Self::new(
            store,
            payments,
            ReferralEngine::from_config(&settings.ledger),
            settings.ledger.activation_price,
            settings.payment.asset.clone(),
        )
    }

    /// Issue a fresh invoice for the activation price
    ///
    /// A previously stored invoice is cancelled on a best-effort basis and the
    /// reference is overwritten.
    pub async fn request_unlock(&self, user_id: i64) -> Result<UnlockOutcome> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(ReferralBotError::UserNotFound { user_id })?;

        if user.activated {
            debug!(user_id = user_id, "Unlock requested by activated user");
            return Ok(UnlockOutcome::AlreadyActive);
        }

        if let Some(stale) = user.last_invoice_id {
            if let Err(e) = self.payments.cancel_invoice(stale).await {
                warn!(user_id = user_id, invoice_id = stale, error = %e, "Failed to cancel stale invoice");
            }
        }

        let invoice = self
            .payments
            .create_invoice(&self.asset, self.price, &user_id.to_string())
            .await?;
        let pay_url = invoice
            .payment_url()
            .map(str::to_string)
            .ok_or_else(|| PaymentError::InvalidResponse("invoice without payment url".to_string()))?;

        self.store.save_invoice(user_id, invoice.invoice_id).await?;

        info!(user_id = user_id, invoice_id = invoice.invoice_id, amount = %self.price, "Invoice issued");
        log_user_action(user_id, "unlock", Some(&invoice.invoice_id.to_string()));

        Ok(UnlockOutcome::InvoiceIssued {
            invoice_id: invoice.invoice_id,
            pay_url,
        })
    }

    /// Check the stored invoice and activate on the first paid confirmation
    pub async fn confirm_payment(&self, user_id: i64) -> Result<ConfirmOutcome> {
        let Some(user) = self.store.find_user(user_id).await? else {
            return Ok(ConfirmOutcome::NotReceived);
        };
        if user.activated {
            return Ok(ConfirmOutcome::AlreadyActive);
        }
        let Some(invoice_id) = user.last_invoice_id else {
            debug!(user_id = user_id, "Payment check without an invoice");
            return Ok(ConfirmOutcome::NotReceived);
        };

        let invoice = match self.payments.get_invoice(invoice_id).await {
            Ok(Some(invoice)) => invoice,
            Ok(None) => {
                warn!(user_id = user_id, invoice_id = invoice_id, "Invoice unknown to the provider");
                return Ok(ConfirmOutcome::NotReceived);
            }
            Err(e) => {
                log_api_error("crypto_pay", &e.to_string(), Some(&format!("getInvoices {}", invoice_id)));
                return Ok(ConfirmOutcome::NotReceived);
            }
        };

        if !invoice.is_paid() {
            debug!(user_id = user_id, invoice_id = invoice_id, status = ?invoice.status, "Invoice not paid yet");
            return Ok(ConfirmOutcome::NotReceived);
        }

        let chain = self.store.referral_chain(user_id).await?;
        let payouts = self.engine.payouts(&chain);

        if !self.store.commit_activation(user_id, &payouts).await? {
            return Ok(ConfirmOutcome::AlreadyActive);
        }

        log_ledger_event(user_id, "activated", self.price, None);
        for payout in &payouts {
            log_ledger_event(payout.beneficiary, payout.level.event_name(), payout.amount, Some(user_id));
        }
        info!(user_id = user_id, invoice_id = invoice_id, payouts = payouts.len(), "User activated");

        Ok(ConfirmOutcome::Activated { payouts })
    }
}
