//! Scripted payment provider
//!
//! Stands in for the Crypto Pay API: invoices are created as active and are
//! flipped to paid by the test.

use std::collections::HashMap;
use std::sync::Mutex;
use async_trait::async_trait;
use rust_decimal::Decimal;
use ReferralBot::services::{Invoice, InvoiceStatus, PaymentProvider};
use ReferralBot::utils::errors::{PaymentError, PaymentResult};

#[derive(Default)]
struct Script {
    invoices: HashMap<i64, Invoice>,
    next_id: i64,
    cancelled: Vec<i64>,
    lookups_fail: bool,
    creation_fails: bool,
}

#[derive(Default)]
pub struct ScriptedPaymentProvider {
    script: Mutex<Script>,
}

impl ScriptedPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_paid(&self, invoice_id: i64) {
        let mut script = self.script.lock().unwrap();
        if let Some(invoice) = script.invoices.get_mut(&invoice_id) {
            invoice.status = InvoiceStatus::Paid;
        }
    }

    /// Make the provider forget an invoice, as if it never existed
    pub fn forget(&self, invoice_id: i64) {
        self.script.lock().unwrap().invoices.remove(&invoice_id);
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.script.lock().unwrap().lookups_fail = fail;
    }

    pub fn fail_creation(&self, fail: bool) {
        self.script.lock().unwrap().creation_fails = fail;
    }

    pub fn created_count(&self) -> usize {
        self.script.lock().unwrap().next_id as usize
    }

    pub fn cancelled(&self) -> Vec<i64> {
        self.script.lock().unwrap().cancelled.clone()
    }

    pub fn invoice(&self, invoice_id: i64) -> Option<Invoice> {
        self.script.lock().unwrap().invoices.get(&invoice_id).cloned()
    }
}

#[async_trait]
impl PaymentProvider for ScriptedPaymentProvider {
    async fn create_invoice(&self, asset: &str, amount: Decimal, payload: &str) -> PaymentResult<Invoice> {
        let mut script = self.script.lock().unwrap();
        if script.creation_fails {
            return Err(PaymentError::ServiceUnavailable);
        }

        script.next_id += 1;
        let invoice = Invoice {
            invoice_id: script.next_id,
            status: InvoiceStatus::Active,
            asset: Some(asset.to_string()),
            amount: Some(amount),
            bot_invoice_url: Some(format!("https://t.me/CryptoBot?start=IV{}", script.next_id)),
            pay_url: None,
            payload: Some(payload.to_string()),
        };
        script.invoices.insert(invoice.invoice_id, invoice.clone());
        Ok(invoice)
    }

    async fn get_invoice(&self, invoice_id: i64) -> PaymentResult<Option<Invoice>> {
        let script = self.script.lock().unwrap();
        if script.lookups_fail {
            return Err(PaymentError::Timeout);
        }
        Ok(script.invoices.get(&invoice_id).cloned())
    }

    async fn cancel_invoice(&self, invoice_id: i64) -> PaymentResult<()> {
        let mut script = self.script.lock().unwrap();
        match script.invoices.remove(&invoice_id) {
            Some(_) => {
                script.cancelled.push(invoice_id);
                Ok(())
            }
            None => Err(PaymentError::Api { code: 400, name: "INVOICE_NOT_FOUND".to_string() }),
        }
    }
}
