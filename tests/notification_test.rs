//! Withdrawal notifications against a mock Telegram API

mod helpers;

use std::sync::Arc;
use chrono::Utc;
use serde_json::json;
use serial_test::serial;
use helpers::*;
use ReferralBot::config::I18nConfig;
use ReferralBot::i18n::I18n;
use ReferralBot::models::WithdrawRequest;
use ReferralBot::services::NotificationService;

fn i18n() -> Arc<I18n> {
    let mut i18n = I18n::new(&I18nConfig {
        default_language: "en".to_string(),
        supported_languages: vec!["en".to_string()],
    });
    i18n.insert_language("en", json!({
        "withdraw_accepted": "Accepted {amount} {asset} to <code>{address}</code>",
        "withdraw_memo": "Memo: {memo}",
        "admin_withdraw": "Withdraw #{id} from {user_id}: {amount} {asset} {address}"
    }))
    .unwrap();
    Arc::new(i18n)
}

fn request() -> WithdrawRequest {
    WithdrawRequest {
        id: 1,
        user_id: 42,
        amount: dec("5.5"),
        address: "UQaddr".to_string(),
        memo: Some("tag".to_string()),
        status: "pending".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
#[serial]
async fn test_user_and_admin_are_notified() {
    let telegram = TelegramMockServer::new().await;
    telegram.mock_send_message(None).await;

    let service = NotificationService::new(telegram.bot(), i18n(), 999, "TON");
    service.notify_withdrawal(&request(), "en").await.unwrap();

    let sent = telegram.sent_messages().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0]["chat_id"], json!(42));
    assert_eq!(sent[0]["parse_mode"], json!("HTML"));
    assert_eq!(sent[0]["text"], json!("Accepted 5.50 TON to <code>UQaddr</code>\nMemo: tag"));
    assert_eq!(sent[1]["chat_id"], json!(999));
    assert_eq!(sent[1]["text"], json!("Withdraw #1 from 42: 5.50 TON UQaddr\ntag"));
}

#[tokio::test]
#[serial]
async fn test_admin_failure_is_not_fatal() {
    let telegram = TelegramMockServer::new().await;
    telegram.mock_send_message(Some(999)).await;

    let service = NotificationService::new(telegram.bot(), i18n(), 999, "TON");
    assert!(service.notify_withdrawal(&request(), "en").await.is_ok());
}

#[tokio::test]
#[serial]
async fn test_admin_is_notified_when_user_send_fails() {
    let telegram = TelegramMockServer::new().await;
    telegram.mock_send_message(Some(42)).await;

    let service = NotificationService::new(telegram.bot(), i18n(), 999, "TON");
    assert!(service.notify_withdrawal(&request(), "en").await.is_err());

    let sent = telegram.sent_messages().await;
    assert_eq!(sent.len(), 2);
    let admin: Vec<_> = sent.iter().filter(|body| body["chat_id"] == json!(999)).collect();
    assert_eq!(admin.len(), 1);
    assert_eq!(admin[0]["text"], json!("Withdraw #1 from 42: 5.50 TON UQaddr\ntag"));
}
