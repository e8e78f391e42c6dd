//! Inline keyboards and callback tags

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;
use crate::i18n::I18n;
use crate::utils::errors::Result;

/// Opaque tags carried by inline buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Unlock,
    Check,
    Balance,
    Invite,
    Stats,
    HowItWorks,
    Withdraw,
}

impl CallbackAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackAction::Unlock => "unlock",
            CallbackAction::Check => "check",
            CallbackAction::Balance => "balance",
            CallbackAction::Invite => "invite",
            CallbackAction::Stats => "stats",
            CallbackAction::HowItWorks => "how_it_works",
            CallbackAction::Withdraw => "withdraw",
        }
    }

    pub fn parse(data: &str) -> Option<Self> {
        let action = match data {
            "unlock" => CallbackAction::Unlock,
            "check" => CallbackAction::Check,
            "balance" => CallbackAction::Balance,
            "invite" => CallbackAction::Invite,
            "stats" => CallbackAction::Stats,
            "how_it_works" => CallbackAction::HowItWorks,
            "withdraw" => CallbackAction::Withdraw,
            _ => return None,
        };
        Some(action)
    }
}

fn button(i18n: &I18n, lang: &str, key: &str, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(i18n.t(key, lang, None), action.as_str())
}

/// Main menu, one button per row
pub fn main_menu(i18n: &I18n, lang: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button(i18n, lang, "menu.unlock", CallbackAction::Unlock)],
        vec![button(i18n, lang, "menu.invite", CallbackAction::Invite)],
        vec![button(i18n, lang, "menu.balance", CallbackAction::Balance)],
        vec![button(i18n, lang, "menu.withdraw", CallbackAction::Withdraw)],
        vec![button(i18n, lang, "menu.stats", CallbackAction::Stats)],
        vec![button(i18n, lang, "menu.how_it_works", CallbackAction::HowItWorks)],
    ])
}

/// Pay link plus the "I paid" check button
pub fn payment_keyboard(i18n: &I18n, lang: &str, pay_url: &str) -> Result<InlineKeyboardMarkup> {
    let url = Url::parse(pay_url)?;
    Ok(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::url(i18n.t("pay_button", lang, None), url),
        button(i18n, lang, "paid_button", CallbackAction::Check),
    ]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::I18nConfig;

    fn i18n() -> I18n {
        I18n::new(&I18nConfig {
            default_language: "en".to_string(),
            supported_languages: vec!["en".to_string()],
        })
    }

    #[test]
    fn test_callback_tags_round_trip() {
        for action in [
            CallbackAction::Unlock,
            CallbackAction::Check,
            CallbackAction::Balance,
            CallbackAction::Invite,
            CallbackAction::Stats,
            CallbackAction::HowItWorks,
            CallbackAction::Withdraw,
        ] {
            assert_eq!(CallbackAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(CallbackAction::parse("lang:en"), None);
    }

    #[test]
    fn test_main_menu_layout() {
        let menu = main_menu(&i18n(), "en");
        assert_eq!(menu.inline_keyboard.len(), 6);
        assert!(menu.inline_keyboard.iter().all(|row| row.len() == 1));
    }

    #[test]
    fn test_payment_keyboard_rejects_bad_url() {
        assert!(payment_keyboard(&i18n(), "en", "not a url").is_err());
        let keyboard = payment_keyboard(&i18n(), "en", "https://t.me/CryptoBot?start=IVabc").unwrap();
        assert_eq!(keyboard.inline_keyboard[0].len(), 2);
    }
}
