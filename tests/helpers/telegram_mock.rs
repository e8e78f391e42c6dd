//! Mock Telegram API Server for testing
//!
//! A wiremock server answering the Bot API methods the bot calls, so
//! outgoing messages can be counted and inspected.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "12345:test_token";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Bot pointed at this server
    pub fn bot(&self) -> Bot {
        let url = self.server.uri().parse().unwrap();
        Bot::new(TEST_BOT_TOKEN).set_api_url(url)
    }

    /// Setup mock for sendMessage endpoint; `fail_chat` answers with an error
    /// for messages to that chat
    pub async fn mock_send_message(&self, fail_chat: Option<i64>) {
        if let Some(chat_id) = fail_chat {
            Mock::given(method("POST"))
                .and(path_regex(r"(?i)/bot[^/]+/sendmessage$"))
                .and(ChatIdMatcher(chat_id))
                .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                    "ok": false,
                    "error_code": 400,
                    "description": "Bad Request: chat not found"
                })))
                .with_priority(1)
                .mount(&self.server)
                .await;
        }

        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/bot[^/]+/sendmessage$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {
                    "message_id": 123,
                    "from": {
                        "id": 12345,
                        "is_bot": true,
                        "first_name": "TestBot",
                        "username": "test_bot"
                    },
                    "chat": {
                        "id": 42,
                        "first_name": "Test",
                        "type": "private"
                    },
                    "date": 1640995200,
                    "text": "Test message"
                }
            })))
            .with_priority(5)
            .mount(&self.server)
            .await;
    }

    /// Bodies of every sendMessage request received so far
    pub async fn sent_messages(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().to_lowercase().ends_with("/sendmessage"))
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}

struct ChatIdMatcher(i64);

impl wiremock::Match for ChatIdMatcher {
    fn matches(&self, request: &wiremock::Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .map(|body| body["chat_id"] == json!(self.0))
            .unwrap_or(false)
    }
}
