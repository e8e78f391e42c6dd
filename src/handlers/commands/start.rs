//! Start command handler
//!
//! Registers the user (with the deep-link referrer, if any) and shows the
//! main menu.

use std::sync::Arc;
use teloxide::{Bot, types::Message};
use tracing::{debug, info};
use crate::config::Settings;
use crate::handlers::{keyboards, send_photo_or_text, views};
use crate::i18n::I18n;
use crate::services::ServiceFactory;
use crate::utils::errors::{ReferralBotError, Result};
use crate::utils::helpers::parse_start_payload;
use crate::utils::logging::log_user_action;

/// Handle /start [ref_id]
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    payload: String,
    services: ServiceFactory,
    settings: Arc<Settings>,
    i18n: Arc<I18n>,
) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| ReferralBotError::InvalidInput("No user in message".to_string()))?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;
    let referrer = parse_start_payload(&payload);

    debug!(user_id = user_id, referrer = ?referrer, "Processing /start command");

    let registration = services
        .user_service
        .register(user_id, referrer, user.language_code.as_deref())
        .await?;

    if registration.created {
        log_user_action(user_id, "registered", registration.user.referrer_id.map(|r| r.to_string()).as_deref());
    } else {
        info!(user_id = user_id, "Existing user started bot");
    }

    let lang = registration.user.language_code;
    let params = views::ledger_params(&settings.ledger, &settings.payment.asset);
    let caption = views::titled(&i18n, &lang, "start_title", "start_text", &params);

    send_photo_or_text(
        &bot,
        chat_id,
        settings.bot.start_photo.as_deref(),
        caption,
        Some(keyboards::main_menu(&i18n, &lang)),
    )
    .await
}
