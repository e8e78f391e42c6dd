//! Withdraw request repository implementation

use rust_decimal::Decimal;
use sqlx::PgPool;
use chrono::Utc;
use crate::models::withdraw::{check_eligibility, NewWithdrawRequest, WithdrawRejection, WithdrawRequest, WithdrawStatus};
use crate::utils::errors::ReferralBotError;

const WITHDRAW_COLUMNS: &str = "id, user_id, amount, address, memo, status, created_at";

#[derive(Debug, Clone)]
pub struct WithdrawRepository {
    pool: PgPool,
}

impl WithdrawRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a pending request for the user's whole balance and zero it
    ///
    /// Balance and activation are re-read under a row lock so the recorded
    /// amount always equals the balance that gets zeroed.
    pub async fn commit(
        &self,
        request: NewWithdrawRequest,
        minimum: Decimal,
    ) -> Result<Result<WithdrawRequest, WithdrawRejection>, ReferralBotError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Decimal, bool)> = sqlx::query_as(
            "SELECT balance, activated FROM users WHERE user_id = $1 FOR UPDATE"
        )
        .bind(request.user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((balance, activated)) = row else {
            tx.rollback().await?;
            return Ok(Err(WithdrawRejection::UnknownUser));
        };

        if let Err(rejection) = check_eligibility(balance, activated, minimum) {
            tx.rollback().await?;
            return Ok(Err(rejection));
        }

        let recorded = sqlx::query_as::<_, WithdrawRequest>(
            &format!(
                r#"
                INSERT INTO withdraw_requests (user_id, amount, address, memo, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {}
                "#,
                WITHDRAW_COLUMNS
            )
        )
        .bind(request.user_id)
        .bind(balance)
        .bind(request.address)
        .bind(request.memo)
        .bind(WithdrawStatus::Pending.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET balance = 0 WHERE user_id = $1")
            .bind(request.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Ok(recorded))
    }

    /// List a user's requests, newest first
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<WithdrawRequest>, ReferralBotError> {
        let requests = sqlx::query_as::<_, WithdrawRequest>(
            &format!(
                "SELECT {} FROM withdraw_requests WHERE user_id = $1 ORDER BY id DESC",
                WITHDRAW_COLUMNS
            )
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
