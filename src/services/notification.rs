//! Notification service implementation
//!
//! Formats and sends the messages produced by a committed withdrawal: the
//! confirmation to the user and the alert to the administrative recipient.

use std::sync::Arc;
use teloxide::{Bot, types::{ChatId, ParseMode}, requests::Requester, payloads::SendMessageSetters};
use tracing::{error, info};
use crate::i18n::I18n;
use crate::models::WithdrawRequest;
use crate::utils::errors::Result;
use crate::utils::helpers::{escape_html, format_amount};

/// Notification service for message handling
#[derive(Clone)]
pub struct NotificationService {
    bot: Bot,
    i18n: Arc<I18n>,
    admin_id: i64,
    asset: String,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(bot: Bot, i18n: Arc<I18n>, admin_id: i64, asset: impl Into<String>) -> Self {
        Self {
            bot,
            i18n,
            admin_id,
            asset: asset.into(),
        }
    }

    /// Tell the user and the admin about a new withdrawal request
    ///
    /// The admin is always tried, even when the user message fails; only the
    /// user message failure is reported.
    pub async fn notify_withdrawal(&self, request: &WithdrawRequest, lang: &str) -> Result<()> {
        let user_text = withdraw_accepted_text(&self.i18n, lang, request, &self.asset);
        let user_sent = self.bot
            .send_message(ChatId(request.user_id), user_text)
            .parse_mode(ParseMode::Html)
            .await;

        let admin_text = admin_withdraw_text(&self.i18n, request, &self.asset);
        match self.bot.send_message(ChatId(self.admin_id), admin_text).await {
            Ok(_) => info!(request_id = request.id, admin_id = self.admin_id, "Admin notified about withdrawal"),
            Err(e) => error!(request_id = request.id, admin_id = self.admin_id, error = %e, "Failed to notify admin"),
        }

        user_sent?;
        Ok(())
    }
}

/// Confirmation shown to the user, HTML formatted
pub fn withdraw_accepted_text(i18n: &I18n, lang: &str, request: &WithdrawRequest, asset: &str) -> String {
    let params = I18n::params([
        ("amount", format_amount(request.amount)),
        ("asset", asset.to_string()),
        ("address", escape_html(&request.address)),
    ]);
    let mut text = i18n.t("withdraw_accepted", lang, Some(&params));

    if let Some(memo) = &request.memo {
        let params = I18n::params([("memo", escape_html(memo))]);
        text.push('\n');
        text.push_str(&i18n.t("withdraw_memo", lang, Some(&params)));
    }
    text
}

/// Plain-text alert for the administrative recipient, always in the default language
pub fn admin_withdraw_text(i18n: &I18n, request: &WithdrawRequest, asset: &str) -> String {
    let params = I18n::params([
        ("id", request.id.to_string()),
        ("user_id", request.user_id.to_string()),
        ("amount", format_amount(request.amount)),
        ("asset", asset.to_string()),
        ("address", request.address.clone()),
    ]);
    let mut text = i18n.t("admin_withdraw", i18n.default_language(), Some(&params));

    if let Some(memo) = &request.memo {
        text.push('\n');
        text.push_str(memo);
    }
    text
}
