//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use rust_decimal::{Decimal, RoundingStrategy};

/// Parse the deep-link payload of `/start` as a referrer id
///
/// Anything that is not a plain positive integer is ignored.
pub fn parse_start_payload(payload: &str) -> Option<i64> {
    let payload = payload.trim();
    if payload.is_empty() || !payload.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    payload.parse::<i64>().ok().filter(|id| *id > 0)
}

/// Split a withdrawal destination message into address and optional memo
///
/// The first whitespace-delimited token is the address, the remainder of the
/// line (trimmed) is the memo.
pub fn split_destination(text: &str) -> Option<(String, Option<String>)> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match text.split_once(char::is_whitespace) {
        Some((address, rest)) => {
            let memo = rest.trim();
            let memo = if memo.is_empty() { None } else { Some(memo.to_string()) };
            Some((address.to_string(), memo))
        }
        None => Some((text.to_string(), None)),
    }
}

/// Format an amount with two decimal places for display
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// Build the referral deep link for a user
pub fn invite_link(bot_username: &str, user_id: i64) -> String {
    format!("https://t.me/{}?start={}", bot_username, user_id)
}

/// Escape text for Telegram HTML parse mode
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
