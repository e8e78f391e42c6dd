//! Message handlers module
//!
//! Free text is only meaningful as the answer to a withdraw prompt; anything
//! else is ignored without a reply.

use std::sync::Arc;
use teloxide::{Bot, types::Message, prelude::*};
use tracing::{debug, error};
use crate::config::Settings;
use crate::handlers::views;
use crate::i18n::I18n;
use crate::services::{ServiceFactory, SubmitOutcome};
use crate::utils::errors::Result;

/// Handle incoming text messages
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    settings: Arc<Settings>,
    i18n: Arc<I18n>,
) -> Result<()> {
    let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
        return Ok(());
    };
    if !msg.chat.id.is_user() || text.starts_with('/') {
        return Ok(());
    }

    let user_id = user.id.0 as i64;
    let outcome = services.withdrawal_service.submit_address(user_id, text).await?;
    if outcome == SubmitOutcome::NoPendingIntent {
        debug!(user_id = user_id, "Ignoring free text");
        return Ok(());
    }

    let lang = services.user_service.language_of(user_id).await?;
    match outcome {
        SubmitOutcome::NoPendingIntent => {}
        SubmitOutcome::EmptyAddress => {
            bot.send_message(msg.chat.id, i18n.t("invalid_address", &lang, None)).await?;
        }
        SubmitOutcome::Rejected(rejection) => {
            let text = views::rejection_text(&i18n, &lang, &rejection, &settings.payment.asset);
            bot.send_message(msg.chat.id, text).await?;
        }
        SubmitOutcome::Accepted(request) => {
            if let Err(e) = services.notification_service.notify_withdrawal(&request, &lang).await {
                error!(user_id = user_id, request_id = request.id, error = %e, "Failed to confirm withdrawal to user");
            }
        }
    }

    Ok(())
}
