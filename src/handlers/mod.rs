//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for free text

pub mod commands;
pub mod callbacks;
pub mod messages;
pub mod keyboards;
pub mod views;

// Re-export commonly used handler functions
pub use commands::{handle_command, Command};
pub use callbacks::handle_callback_query;
pub use messages::handle_message;

use std::path::Path;
use teloxide::{Bot, prelude::*, types::{ChatId, InlineKeyboardMarkup, InputFile, ParseMode}};
use tracing::warn;
use crate::utils::errors::Result;

/// Send a captioned photo, or the caption as plain text when the photo file is missing
pub async fn send_photo_or_text(
    bot: &Bot,
    chat_id: ChatId,
    photo: Option<&str>,
    caption: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> Result<()> {
    match photo.filter(|path| Path::new(path).exists()) {
        Some(path) => {
            let request = bot
                .send_photo(chat_id, InputFile::file(path))
                .caption(caption)
                .parse_mode(ParseMode::Html);
            match keyboard {
                Some(keyboard) => request.reply_markup(keyboard).await?,
                None => request.await?,
            };
        }
        None => {
            if let Some(path) = photo {
                warn!(path = %path, "Photo not found, sending text instead");
            }
            let request = bot.send_message(chat_id, caption).parse_mode(ParseMode::Html);
            match keyboard {
                Some(keyboard) => request.reply_markup(keyboard).await?,
                None => request.await?,
            };
        }
    }
    Ok(())
}
