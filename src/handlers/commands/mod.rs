//! Command handlers module
//!
//! This module contains handlers for the bot commands, /start and /help.

pub mod start;
pub mod help;

use std::sync::Arc;
use teloxide::{Bot, types::Message, utils::command::BotCommands};
use crate::config::Settings;
use crate::utils::errors::Result;
use crate::services::ServiceFactory;
use crate::i18n::I18n;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "ReferralBot commands:")]
pub enum Command {
    #[command(description = "Open the main menu; accepts an invite code")]
    Start(String),
    #[command(description = "Show help information")]
    Help,
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: ServiceFactory,
    settings: Arc<Settings>,
    i18n: Arc<I18n>,
) -> Result<()> {
    match cmd {
        Command::Start(payload) => start::handle_start(bot, msg, payload, services, settings, i18n).await,
        Command::Help => help::handle_help(bot, msg, services, i18n).await,
    }
}
