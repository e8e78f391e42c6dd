//! Ledger flows against the Postgres adapter
//!
//! Runs against `TEST_DATABASE_URL` when set, otherwise against a Postgres
//! container started per test.

mod helpers;

use std::sync::Arc;
use assert_matches::assert_matches;
use rust_decimal::Decimal;
use serial_test::serial;
use helpers::*;
use ReferralBot::database::LedgerStore;
use ReferralBot::models::{CreateUserRequest, NewWithdrawRequest, Payout, ReferralLevel, WithdrawRejection};
use ReferralBot::services::{ConfirmOutcome, SubmitOutcome};

fn user(user_id: i64, referrer_id: Option<i64>) -> CreateUserRequest {
    CreateUserRequest { user_id, referrer_id, language_code: Some("ru".to_string()) }
}

#[tokio::test]
#[serial]
async fn test_create_user_is_idempotent() {
    let db = TestDatabase::new().await;
    let store = db.store();

    assert!(store.create_user(user(1, None)).await.unwrap());
    assert!(!store.create_user(user(1, Some(2))).await.unwrap());

    let stored = store.find_user(1).await.unwrap().unwrap();
    assert_eq!(stored.referrer_id, None);
    assert_eq!(stored.language_code, "ru");
    assert_eq!(stored.balance, Decimal::ZERO);
    assert!(!stored.activated);
}

#[tokio::test]
#[serial]
async fn test_commit_activation_credits_once() {
    let db = TestDatabase::new().await;
    let store = db.store();
    store.create_user(user(1, None)).await.unwrap();
    store.create_user(user(2, Some(1))).await.unwrap();

    let payouts = vec![Payout { beneficiary: 1, level: ReferralLevel::First, amount: dec("0.5") }];
    assert!(store.commit_activation(2, &payouts).await.unwrap());
    assert!(!store.commit_activation(2, &payouts).await.unwrap());

    assert_eq!(store.balance(1).await.unwrap(), dec("0.5"));
    assert!(store.is_activated(2).await.unwrap());
}

#[tokio::test]
#[serial]
async fn test_abc_scenario_on_postgres() {
    let db = TestDatabase::new().await;
    let ctx = TestContext::with_store(test_settings(), Arc::new(db.store()));

    ctx.register(1, None).await;
    ctx.activate(1).await;
    ctx.register(2, Some(1)).await;
    ctx.activate(2).await;
    ctx.register(3, Some(2)).await;
    assert_matches!(ctx.activate(3).await, ConfirmOutcome::Activated { .. });

    assert_eq!(ctx.balance(1).await, dec("0.75"));
    assert_eq!(ctx.balance(2).await, dec("0.5"));
    assert_eq!(ctx.balance(3).await, Decimal::ZERO);

    let stats = ctx.store.referral_stats(1).await.unwrap();
    assert_eq!((stats.total, stats.active, stats.second), (1, 1, 1));
}

#[tokio::test]
#[serial]
async fn test_withdrawal_commit_on_postgres() {
    let db = TestDatabase::new().await;
    let store = db.store();
    store.create_user(user(1, None)).await.unwrap();
    store.add_balance(1, dec("6")).await.unwrap();

    let request = || NewWithdrawRequest { user_id: 1, address: "UQaddr".to_string(), memo: None };

    assert_eq!(
        store.commit_withdrawal(request(), dec("5")).await.unwrap(),
        Err(WithdrawRejection::NotActivated)
    );
    assert_eq!(
        store.commit_withdrawal(NewWithdrawRequest { user_id: 7, ..request() }, dec("5")).await.unwrap(),
        Err(WithdrawRejection::UnknownUser)
    );

    store.commit_activation(1, &[]).await.unwrap();
    let recorded = store.commit_withdrawal(request(), dec("5")).await.unwrap().unwrap();
    assert_eq!(recorded.amount, dec("6"));
    assert_eq!(store.balance(1).await.unwrap(), Decimal::ZERO);
    assert_eq!(store.withdrawals_for(1).await.unwrap(), vec![recorded]);
}

#[tokio::test]
#[serial]
async fn test_withdraw_flow_on_postgres() {
    let db = TestDatabase::new().await;
    let ctx = TestContext::with_store(test_settings(), Arc::new(db.store()));

    ctx.register(1, None).await;
    ctx.activate(1).await;
    ctx.store.add_balance(1, dec("5.25")).await.unwrap();

    ctx.withdrawal.begin(1).await.unwrap();
    let outcome = ctx.withdrawal.submit_address(1, "UQaddr memo").await.unwrap();
    assert_matches!(outcome, SubmitOutcome::Accepted(ref r) if r.amount == dec("5.25") && r.memo.as_deref() == Some("memo"));
    assert_eq!(ctx.balance(1).await, Decimal::ZERO);
}

#[tokio::test]
#[serial]
async fn test_referral_stats_on_postgres() {
    let db = TestDatabase::new().await;
    let ctx = TestContext::with_store(test_settings(), Arc::new(db.store()));
    ctx.register(1, None).await;

    for id in [10, 11, 12] {
        ctx.register(id, Some(1)).await;
    }
    ctx.activate(10).await;
    ctx.activate(11).await;

    ctx.register(20, Some(10)).await;
    ctx.register(21, Some(11)).await;
    ctx.register(23, Some(12)).await;
    ctx.activate(20).await;
    ctx.activate(21).await;
    ctx.activate(23).await;

    let stats = ctx.store.referral_stats(1).await.unwrap();
    assert_eq!((stats.total, stats.active, stats.second), (3, 2, 2));
    assert_eq!(ctx.balance(1).await, dec("1.75"));
}
