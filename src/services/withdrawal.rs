//! Withdrawal request flow
//!
//! `begin` checks the thresholds and opens a session-scoped intent in the
//! state storage; the next free-text message from the user is handed to
//! `submit_address`, which commits the request through the ledger store.

use std::sync::Arc;
use chrono::Duration;
use rust_decimal::Decimal;
use tracing::{debug, info};
use crate::config::Settings;
use crate::database::LedgerStore;
use crate::models::{check_eligibility, NewWithdrawRequest, WithdrawRejection, WithdrawRequest};
use crate::state::{ConversationContext, StateStorage};
use crate::utils::errors::Result;
use crate::utils::helpers::split_destination;
use crate::utils::logging::{log_ledger_event, log_user_action, log_withdraw_request};

pub const WITHDRAW_SCENARIO: &str = "withdraw";
pub const ADDRESS_STEP: &str = "address_input";
/// Balance shown when the address was requested
pub const PROMPTED_BALANCE: &str = "balance";

#[derive(Debug, Clone, PartialEq)]
pub enum BeginOutcome {
    Rejected(WithdrawRejection),
    AwaitingAddress { balance: Decimal },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The message is not an answer to a withdraw prompt
    NoPendingIntent,
    /// Blank message; the intent stays open
    EmptyAddress,
    /// Thresholds no longer hold at commit time; the intent is closed
    Rejected(WithdrawRejection),
    Accepted(WithdrawRequest),
}

#[derive(Clone)]
pub struct WithdrawalService {
    store: Arc<dyn LedgerStore>,
    state: Arc<dyn StateStorage>,
    min_withdraw: Decimal,
    intent_ttl: Duration,
}

impl WithdrawalService {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        state: Arc<dyn StateStorage>,
        min_withdraw: Decimal,
        intent_ttl: Duration,
    ) -> Self {
        Self {
            store,
            state,
            min_withdraw,
            intent_ttl,
        }
    }

    pub fn from_settings(
        store: Arc<dyn LedgerStore>,
        state: Arc<dyn StateStorage>,
        settings: &Settings,
    ) -> Self {
        Self::new(
            store,
            state,
            settings.ledger.min_withdraw,
            Duration::seconds(settings.redis.ttl_seconds as i64),
        )
    }

    /// Check thresholds and, if they hold, wait for a destination address
    ///
    /// A second trigger replaces the first intent.
    pub async fn begin(&self, user_id: i64) -> Result<BeginOutcome> {
        let Some(user) = self.store.find_user(user_id).await? else {
            return Ok(BeginOutcome::Rejected(WithdrawRejection::UnknownUser));
        };

        if let Err(rejection) = check_eligibility(user.balance, user.activated, self.min_withdraw) {
            debug!(user_id = user_id, rejection = ?rejection, "Withdrawal refused");
            return Ok(BeginOutcome::Rejected(rejection));
        }

        let mut context = ConversationContext::new(user_id);
        context.start_scenario(WITHDRAW_SCENARIO, ADDRESS_STEP, self.intent_ttl);
        context.set_data(PROMPTED_BALANCE, user.balance)?;
        self.state.save_context(&context).await?;

        log_user_action(user_id, "withdraw_started", None);
        Ok(BeginOutcome::AwaitingAddress { balance: user.balance })
    }

    /// Whether the user's next message should be read as an address
    pub async fn has_pending_intent(&self, user_id: i64) -> Result<bool> {
        Ok(self.pending_intent(user_id).await?.is_some())
    }

    async fn pending_intent(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        Ok(self
            .state
            .load_context(user_id)
            .await?
            .filter(|context| context.is_at(WITHDRAW_SCENARIO, ADDRESS_STEP)))
    }

    /// Commit a withdrawal using `text` as `address [memo]`
    pub async fn submit_address(&self, user_id: i64, text: &str) -> Result<SubmitOutcome> {
        let Some(intent) = self.pending_intent(user_id).await? else {
            return Ok(SubmitOutcome::NoPendingIntent);
        };

        let Some((address, memo)) = split_destination(text) else {
            return Ok(SubmitOutcome::EmptyAddress);
        };

        let prompted: Option<Decimal> = intent.get_data(PROMPTED_BALANCE).unwrap_or_default();
        let request = NewWithdrawRequest { user_id, address, memo };
        let committed = self.store.commit_withdrawal(request, self.min_withdraw).await?;
        self.state.delete_context(user_id).await?;

        match committed {
            Ok(recorded) => {
                if let Some(prompted) = prompted.filter(|amount| *amount != recorded.amount) {
                    info!(
                        user_id = user_id,
                        prompted = %prompted,
                        committed = %recorded.amount,
                        "Balance changed since the withdraw prompt"
                    );
                }
                log_withdraw_request(recorded.id, user_id, recorded.amount);
                log_ledger_event(user_id, "withdraw_requested", recorded.amount, None);
                info!(user_id = user_id, request_id = recorded.id, amount = %recorded.amount, "Withdrawal accepted");
                Ok(SubmitOutcome::Accepted(recorded))
            }
            Err(rejection) => {
                debug!(user_id = user_id, rejection = ?rejection, "Withdrawal refused at commit");
                Ok(SubmitOutcome::Rejected(rejection))
            }
        }
    }
}
