//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A bot user together with their ledger position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Telegram account id
    pub user_id: i64,
    /// Written once at creation, never changed afterwards
    pub referrer_id: Option<i64>,
    /// Flips false -> true on the first confirmed payment, never back
    pub activated: bool,
    pub balance: Decimal,
    /// Most recent invoice issued for activation; older ones are orphaned
    pub last_invoice_id: Option<i64>,
    pub language_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub user_id: i64,
    pub referrer_id: Option<i64>,
    pub language_code: Option<String>,
}
