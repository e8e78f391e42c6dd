//! User repository implementation

use rust_decimal::Decimal;
use sqlx::PgPool;
use chrono::Utc;
use crate::models::referral::{Payout, ReferralStats};
use crate::models::user::{User, CreateUserRequest};
use crate::utils::errors::ReferralBotError;

const USER_COLUMNS: &str =
    "user_id, referrer_id, activated, balance, last_invoice_id, language_code, created_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user unless one already exists; returns true if inserted
    pub async fn create_if_absent(&self, request: CreateUserRequest) -> Result<bool, ReferralBotError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (user_id, referrer_id, language_code, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO NOTHING
            "#
        )
        .bind(request.user_id)
        .bind(request.referrer_id)
        .bind(request.language_code.unwrap_or_else(|| "en".to_string()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Find user by Telegram ID
    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, ReferralBotError> {
        let user = sqlx::query_as::<_, User>(
            &format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS)
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Increment a user's balance
    pub async fn add_balance(&self, user_id: i64, amount: Decimal) -> Result<(), ReferralBotError> {
        sqlx::query("UPDATE users SET balance = balance + $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(amount)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Replace the pending invoice reference
    pub async fn set_last_invoice(&self, user_id: i64, invoice_id: i64) -> Result<(), ReferralBotError> {
        sqlx::query("UPDATE users SET last_invoice_id = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(invoice_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Activate a user and credit the payouts in one transaction
    ///
    /// Returns false without touching any balance when the user was already
    /// activated (or does not exist).
    pub async fn activate_with_payouts(&self, user_id: i64, payouts: &[Payout]) -> Result<bool, ReferralBotError> {
        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query(
            "UPDATE users SET activated = TRUE WHERE user_id = $1 AND activated = FALSE"
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if flipped == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        for payout in payouts {
            sqlx::query("UPDATE users SET balance = balance + $2 WHERE user_id = $1")
                .bind(payout.beneficiary)
                .bind(payout.amount)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Count direct referrals, activated direct referrals and activated
    /// referrals of activated direct referrals
    pub async fn referral_stats(&self, user_id: i64) -> Result<ReferralStats, ReferralBotError> {
        let (total, active, second): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users WHERE referrer_id = $1),
                (SELECT COUNT(*) FROM users WHERE referrer_id = $1 AND activated),
                (SELECT COUNT(*) FROM users
                 WHERE activated
                   AND referrer_id IN (
                       SELECT user_id FROM users WHERE referrer_id = $1 AND activated
                   ))
            "#
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ReferralStats { total, active, second })
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, ReferralBotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
