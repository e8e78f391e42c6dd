//! Message texts rendered from service outcomes

use crate::config::LedgerConfig;
use crate::i18n::{I18n, TranslationParams};
use crate::models::{ReferralStats, WithdrawRejection};
use crate::utils::helpers::format_amount;

/// Ledger constants every explanatory text may refer to
pub fn ledger_params(ledger: &LedgerConfig, asset: &str) -> TranslationParams {
    I18n::params([
        ("price", ledger.activation_price.normalize().to_string()),
        ("level1", ledger.level1_bonus.normalize().to_string()),
        ("level2", ledger.level2_bonus.normalize().to_string()),
        ("min", ledger.min_withdraw.normalize().to_string()),
        ("asset", asset.to_string()),
    ])
}

/// Bold title followed by a body, HTML formatted
pub fn titled(i18n: &I18n, lang: &str, title_key: &str, body_key: &str, params: &TranslationParams) -> String {
    format!(
        "<b>{}</b>\n\n{}",
        i18n.t(title_key, lang, Some(params)),
        i18n.t(body_key, lang, Some(params))
    )
}

pub fn stats_text(
    i18n: &I18n,
    lang: &str,
    stats: &ReferralStats,
    earned: rust_decimal::Decimal,
    asset: &str,
) -> String {
    let params = I18n::params([
        ("total", stats.total.to_string()),
        ("active", stats.active.to_string()),
        ("second", stats.second.to_string()),
        ("earned", format_amount(earned)),
        ("asset", asset.to_string()),
    ]);
    titled(i18n, lang, "stats_title", "stats_text", &params)
}

/// Alert text for a refused withdrawal
pub fn rejection_text(i18n: &I18n, lang: &str, rejection: &WithdrawRejection, asset: &str) -> String {
    match rejection {
        WithdrawRejection::BelowMinimum { minimum, .. } => {
            let params = I18n::params([
                ("min", minimum.normalize().to_string()),
                ("asset", asset.to_string()),
            ]);
            i18n.t("min_withdraw", lang, Some(&params))
        }
        WithdrawRejection::NotActivated => i18n.t("withdraw_not_activated", lang, None),
        WithdrawRejection::UnknownUser => i18n.t("error", lang, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use crate::config::I18nConfig;

    fn i18n() -> I18n {
        let mut i18n = I18n::new(&I18nConfig {
            default_language: "en".to_string(),
            supported_languages: vec!["en".to_string()],
        });
        i18n.insert_language("en", json!({
            "stats_title": "Stats",
            "stats_text": "{total}/{active}/{second} {earned} {asset}",
            "min_withdraw": "Min {min} {asset}",
            "withdraw_not_activated": "Activate first",
            "how_it_works_title": "How",
            "how_it_works_text": "{price} {level1} {level2} {min} {asset}"
        }))
        .unwrap();
        i18n
    }

    #[test]
    fn test_stats_text() {
        let stats = ReferralStats { total: 3, active: 2, second: 1 };
        let text = stats_text(&i18n(), "en", &stats, Decimal::new(125, 2), "TON");
        assert_eq!(text, "<b>Stats</b>\n\n3/2/1 1.25 TON");
    }

    #[test]
    fn test_ledger_params_are_normalized() {
        let params = ledger_params(&crate::config::Settings::default().ledger, "TON");
        let text = titled(&i18n(), "en", "how_it_works_title", "how_it_works_text", &params);
        assert_eq!(text, "<b>How</b>\n\n1 0.5 0.25 5 TON");
    }

    #[test]
    fn test_rejection_texts() {
        let i18n = i18n();
        let below = WithdrawRejection::BelowMinimum { balance: Decimal::ONE, minimum: Decimal::from(5) };
        assert_eq!(rejection_text(&i18n, "en", &below, "TON"), "Min 5 TON");
        assert_eq!(rejection_text(&i18n, "en", &WithdrawRejection::NotActivated, "TON"), "Activate first");
    }
}
