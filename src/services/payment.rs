//! Payment provider integration
//!
//! The `PaymentProvider` port covers the three calls the activation flow
//! needs. `CryptoPayClient` implements it against the Crypto Pay HTTP API
//! (`createInvoice`, `getInvoices`, `deleteInvoice`).

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use crate::config::PaymentConfig;
use crate::utils::errors::{PaymentError, PaymentResult, ReferralBotError, Result};

/// Invoice status as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Active,
    Paid,
    Expired,
    #[serde(other)]
    Other,
}

/// Invoice as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: i64,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub bot_invoice_url: Option<String>,
    /// Deprecated by the provider in favour of `bot_invoice_url`
    #[serde(default)]
    pub pay_url: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    /// Link the user opens to pay
    pub fn payment_url(&self) -> Option<&str> {
        self.bot_invoice_url.as_deref().or(self.pay_url.as_deref())
    }
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_invoice(&self, asset: &str, amount: Decimal, payload: &str) -> PaymentResult<Invoice>;

    /// Look an invoice up by id; `None` when the provider does not know it
    async fn get_invoice(&self, invoice_id: i64) -> PaymentResult<Option<Invoice>>;

    async fn cancel_invoice(&self, invoice_id: i64) -> PaymentResult<()>;
}

/// Crypto Pay API envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: u16,
    name: String,
}

#[derive(Debug, Deserialize)]
struct InvoiceList {
    items: Vec<Invoice>,
}

#[derive(Debug, Serialize)]
struct CreateInvoiceParams<'a> {
    asset: &'a str,
    amount: String,
    payload: &'a str,
}

#[derive(Debug, Serialize)]
struct GetInvoicesParams {
    invoice_ids: String,
}

#[derive(Debug, Serialize)]
struct DeleteInvoiceParams {
    invoice_id: i64,
}

/// Crypto Pay API client
#[derive(Debug, Clone)]
pub struct CryptoPayClient {
    client: Client,
    api_url: String,
    token: String,
}

impl CryptoPayClient {
    /// Create a new client from payment settings
    pub fn new(config: &PaymentConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("ReferralBot/1.0")
            .build()
            .map_err(ReferralBotError::Http)?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    async fn call<P, T>(&self, method: &str, params: &P) -> PaymentResult<T>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.api_url, method);
        debug!(method = method, url = %url, "Calling Crypto Pay API");

        let response = self.client
            .post(&url)
            .header("Crypto-Pay-API-Token", &self.token)
            .json(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::Timeout
                } else if e.is_connect() {
                    PaymentError::ServiceUnavailable
                } else {
                    PaymentError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await
            .map_err(|e| PaymentError::RequestFailed(e.to_string()))?;

        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                PaymentError::InvalidResponse(e.to_string())
            } else {
                PaymentError::RequestFailed(format!("HTTP {}: {}", status, body))
            }
        })?;

        if !envelope.ok {
            let error = envelope.error.unwrap_or(ApiError {
                code: status.as_u16(),
                name: "UNKNOWN".to_string(),
            });
            warn!(method = method, code = error.code, name = %error.name, "Crypto Pay API returned an error");
            return Err(PaymentError::Api { code: error.code, name: error.name });
        }

        envelope.result.ok_or_else(|| {
            PaymentError::InvalidResponse(format!("{} returned ok without result", method))
        })
    }
}

#[async_trait]
impl PaymentProvider for CryptoPayClient {
    async fn create_invoice(&self, asset: &str, amount: Decimal, payload: &str) -> PaymentResult<Invoice> {
        let params = CreateInvoiceParams {
            asset,
            amount: amount.normalize().to_string(),
            payload,
        };
        self.call("createInvoice", &params).await
    }

    async fn get_invoice(&self, invoice_id: i64) -> PaymentResult<Option<Invoice>> {
        let params = GetInvoicesParams { invoice_ids: invoice_id.to_string() };
        let list: InvoiceList = self.call("getInvoices", &params).await?;
        Ok(list.items.into_iter().find(|invoice| invoice.invoice_id == invoice_id))
    }

    async fn cancel_invoice(&self, invoice_id: i64) -> PaymentResult<()> {
        let params = DeleteInvoiceParams { invoice_id };
        let _: bool = self.call("deleteInvoice", &params).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use serde_json::json;

    async fn client_for(server: &MockServer) -> CryptoPayClient {
        CryptoPayClient::new(&PaymentConfig {
            token: "test_pay_token".to_string(),
            api_url: format!("{}/api/", server.uri()),
            asset: "TON".to_string(),
            timeout_seconds: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_invoice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/createInvoice"))
            .and(header("Crypto-Pay-API-Token", "test_pay_token"))
            .and(body_json(json!({"asset": "TON", "amount": "1", "payload": "42"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {
                    "invoice_id": 777,
                    "status": "active",
                    "asset": "TON",
                    "amount": "1",
                    "pay_url": "https://t.me/CryptoBot?start=IVold",
                    "bot_invoice_url": "https://t.me/CryptoBot?start=IVabc",
                    "payload": "42"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let invoice = client.create_invoice("TON", Decimal::ONE, "42").await.unwrap();

        assert_eq!(invoice.invoice_id, 777);
        assert_eq!(invoice.status, InvoiceStatus::Active);
        assert_eq!(invoice.payment_url(), Some("https://t.me/CryptoBot?start=IVabc"));
        assert_eq!(invoice.amount, Some(Decimal::ONE));
    }

    #[tokio::test]
    async fn test_get_invoice_paid_and_missing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/getInvoices"))
            .and(body_json(json!({"invoice_ids": "777"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"items": [{"invoice_id": 777, "status": "paid"}]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/getInvoices"))
            .and(body_json(json!({"invoice_ids": "778"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"items": []}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.get_invoice(777).await.unwrap().unwrap().is_paid());
        assert!(client.get_invoice(778).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_status_maps_to_other() {
        let invoice: Invoice = serde_json::from_value(json!({
            "invoice_id": 1,
            "status": "refunded",
            "pay_url": "https://t.me/CryptoBot?start=IV1"
        }))
        .unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Other);
        assert!(!invoice.is_paid());
        assert_eq!(invoice.payment_url(), Some("https://t.me/CryptoBot?start=IV1"));
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/deleteInvoice"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "ok": false,
                "error": {"code": 401, "name": "UNAUTHORIZED"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.cancel_invoice(5).await.unwrap_err();
        assert!(matches!(err, PaymentError::Api { code: 401, ref name } if name == "UNAUTHORIZED"));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/getInvoices"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_invoice(1).await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidResponse(_)));
    }
}
