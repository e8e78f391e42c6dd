//! Help command handler

use std::sync::Arc;
use teloxide::{Bot, types::Message, prelude::*};
use crate::i18n::I18n;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(bot: Bot, msg: Message, services: ServiceFactory, i18n: Arc<I18n>) -> Result<()> {
    let lang = match msg.from.as_ref() {
        Some(user) => services.user_service.language_of(user.id.0 as i64).await?,
        None => i18n.default_language().to_string(),
    };

    bot.send_message(msg.chat.id, i18n.t("help", &lang, None)).await?;
    Ok(())
}
