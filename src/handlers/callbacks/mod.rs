//! Callback query handlers module
//!
//! Routes inline keyboard presses from the main menu and the invoice message.
//! Transient failures (unpaid invoice, unmet withdrawal thresholds) are shown
//! as alerts on the button press; everything else is a new message.

use std::sync::Arc;
use teloxide::{Bot, types::{CallbackQuery, ChatId, ParseMode}, prelude::*};
use tracing::{debug, error, warn};
use crate::config::Settings;
use crate::handlers::keyboards::{self, CallbackAction};
use crate::handlers::{send_photo_or_text, views};
use crate::i18n::I18n;
use crate::services::{BeginOutcome, ConfirmOutcome, ServiceFactory, UnlockOutcome};
use crate::utils::errors::{ReferralBotError, Result};
use crate::utils::helpers::{format_amount, invite_link};
use crate::utils::logging::log_user_action;

/// Main callback query dispatcher
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    settings: Arc<Settings>,
    i18n: Arc<I18n>,
) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    let Some(action) = query.data.as_deref().and_then(CallbackAction::parse) else {
        warn!(user_id = user_id, data = ?query.data, "Unknown callback data");
        bot.answer_callback_query(query.id.clone()).await?;
        return Ok(());
    };

    debug!(user_id = user_id, action = action.as_str(), "Processing callback");

    // Users reaching the menu without /start are registered without a referrer
    let lang = services
        .user_service
        .register(user_id, None, query.from.language_code.as_deref())
        .await?
        .user
        .language_code;

    let ctx = CallbackContext {
        bot: &bot,
        query: &query,
        chat_id,
        user_id,
        lang: &lang,
        services: &services,
        settings: &settings,
        i18n: &i18n,
    };

    let result = match action {
        CallbackAction::Unlock => ctx.unlock().await,
        CallbackAction::Check => ctx.check().await,
        CallbackAction::Balance => ctx.balance().await,
        CallbackAction::Invite => ctx.invite().await,
        CallbackAction::Stats => ctx.stats().await,
        CallbackAction::HowItWorks => ctx.how_it_works().await,
        CallbackAction::Withdraw => ctx.withdraw().await,
    };

    if let Err(e) = result {
        error!(user_id = user_id, action = action.as_str(), error = %e, "Callback failed");
        if let Err(alert_error) = ctx.alert(&i18n.t("error", &lang, None)).await {
            warn!(user_id = user_id, error = %alert_error, "Failed to answer callback");
        }
        return Err(e);
    }
    Ok(())
}

struct CallbackContext<'a> {
    bot: &'a Bot,
    query: &'a CallbackQuery,
    chat_id: ChatId,
    user_id: i64,
    lang: &'a str,
    services: &'a ServiceFactory,
    settings: &'a Settings,
    i18n: &'a I18n,
}

impl CallbackContext<'_> {
    fn asset(&self) -> &str {
        &self.settings.payment.asset
    }

    async fn ack(&self) -> Result<()> {
        self.bot.answer_callback_query(self.query.id.clone()).await?;
        Ok(())
    }

    async fn alert(&self, text: &str) -> Result<()> {
        self.bot
            .answer_callback_query(self.query.id.clone())
            .text(text)
            .show_alert(true)
            .await?;
        Ok(())
    }

    async fn send_html(&self, text: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn send_access(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, self.i18n.t("access", self.lang, None))
            .reply_markup(keyboards::main_menu(self.i18n, self.lang))
            .await?;
        Ok(())
    }

    async fn unlock(&self) -> Result<()> {
        let outcome = match self.services.activation_service.request_unlock(self.user_id).await {
            Ok(outcome) => outcome,
            Err(ReferralBotError::Payment(e)) => {
                warn!(user_id = self.user_id, error = %e, "Invoice creation failed");
                return self.alert(&self.i18n.t("payment_unavailable", self.lang, None)).await;
            }
            Err(e) => return Err(e),
        };

        match outcome {
            UnlockOutcome::AlreadyActive => self.send_access().await?,
            UnlockOutcome::InvoiceIssued { pay_url, .. } => {
                let params = views::ledger_params(&self.settings.ledger, self.asset());
                self.bot
                    .send_message(self.chat_id, self.i18n.t("pay_title", self.lang, Some(&params)))
                    .reply_markup(keyboards::payment_keyboard(self.i18n, self.lang, &pay_url)?)
                    .await?;
            }
        }
        self.ack().await
    }

    async fn check(&self) -> Result<()> {
        match self.services.activation_service.confirm_payment(self.user_id).await? {
            ConfirmOutcome::NotReceived => {
                self.alert(&self.i18n.t("payment_not_received", self.lang, None)).await
            }
            ConfirmOutcome::Activated { .. } | ConfirmOutcome::AlreadyActive => {
                self.send_access().await?;
                self.ack().await
            }
        }
    }

    async fn balance(&self) -> Result<()> {
        let balance = self.services.user_service.balance(self.user_id).await?;
        let params = I18n::params([
            ("amount", format_amount(balance)),
            ("asset", self.asset().to_string()),
        ]);
        self.send_html(self.i18n.t("balance_text", self.lang, Some(&params))).await?;
        self.ack().await
    }

    async fn invite(&self) -> Result<()> {
        let me = self.bot.get_me().await?;
        let params = I18n::params([("link", invite_link(me.username(), self.user_id))]);
        self.bot
            .send_message(self.chat_id, self.i18n.t("invite_text", self.lang, Some(&params)))
            .await?;
        log_user_action(self.user_id, "invite", None);
        self.ack().await
    }

    async fn stats(&self) -> Result<()> {
        let overview = self.services.user_service.overview(self.user_id).await?;
        let text = views::stats_text(self.i18n, self.lang, &overview.stats, overview.balance, self.asset());
        self.send_html(text).await?;
        self.ack().await
    }

    async fn how_it_works(&self) -> Result<()> {
        let params = views::ledger_params(&self.settings.ledger, self.asset());
        let caption = views::titled(self.i18n, self.lang, "how_it_works_title", "how_it_works_text", &params);
        send_photo_or_text(
            self.bot,
            self.chat_id,
            self.settings.bot.how_it_works_photo.as_deref(),
            caption,
            None,
        )
        .await?;
        self.ack().await
    }

    async fn withdraw(&self) -> Result<()> {
        match self.services.withdrawal_service.begin(self.user_id).await? {
            BeginOutcome::Rejected(rejection) => {
                self.alert(&views::rejection_text(self.i18n, self.lang, &rejection, self.asset())).await
            }
            BeginOutcome::AwaitingAddress { balance } => {
                let params = I18n::params([
                    ("amount", format_amount(balance)),
                    ("asset", self.asset().to_string()),
                ]);
                self.bot
                    .send_message(self.chat_id, self.i18n.t("withdraw_request_text", self.lang, Some(&params)))
                    .await?;
                self.ack().await
            }
        }
    }
}
