//! Withdrawal request model

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A logged request to pay out a user's balance
///
/// Rows are append-only from the bot's point of view; moving a request to
/// approved or rejected is done by an operator outside the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WithdrawRequest {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub address: String,
    pub memo: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl WithdrawRequest {
    /// Parsed status; unknown values are treated as pending
    pub fn status(&self) -> WithdrawStatus {
        self.status.parse().unwrap_or(WithdrawStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWithdrawRequest {
    pub user_id: i64,
    pub address: String,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawStatus {
    Pending,
    Approved,
    Rejected,
}

impl WithdrawStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawStatus::Pending => "pending",
            WithdrawStatus::Approved => "approved",
            WithdrawStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for WithdrawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WithdrawStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WithdrawStatus::Pending),
            "approved" => Ok(WithdrawStatus::Approved),
            "rejected" => Ok(WithdrawStatus::Rejected),
            other => Err(format!("unknown withdraw status: {}", other)),
        }
    }
}

/// Why a withdrawal may not proceed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawRejection {
    BelowMinimum { balance: Decimal, minimum: Decimal },
    NotActivated,
    UnknownUser,
}

/// Check withdrawal preconditions in order: balance first, then activation
pub fn check_eligibility(
    balance: Decimal,
    activated: bool,
    minimum: Decimal,
) -> Result<(), WithdrawRejection> {
    if balance < minimum {
        return Err(WithdrawRejection::BelowMinimum { balance, minimum });
    }
    if !activated {
        return Err(WithdrawRejection::NotActivated);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!("approved".parse::<WithdrawStatus>(), Ok(WithdrawStatus::Approved));
        assert!("paid".parse::<WithdrawStatus>().is_err());
        assert_eq!(WithdrawStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_balance_checked_before_activation() {
        let min = Decimal::from(5);
        assert_eq!(
            check_eligibility(Decimal::ONE, false, min),
            Err(WithdrawRejection::BelowMinimum { balance: Decimal::ONE, minimum: min })
        );
        assert_eq!(check_eligibility(min, false, min), Err(WithdrawRejection::NotActivated));
        assert_eq!(check_eligibility(min, true, min), Ok(()));
    }
}
