//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ReferralBot application.

use rust_decimal::Decimal;
use tracing::{info, warn, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{ReferralBotError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "referralbot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout));
    let file_layer = tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking);

    let installed = if config.json {
        registry.with(file_layer.json()).try_init()
    } else {
        registry.with(file_layer).try_init()
    };
    installed.map_err(|e| ReferralBotError::Config(format!("Failed to install subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log a balance-affecting ledger event
pub fn log_ledger_event(user_id: i64, event: &str, amount: Decimal, counterparty: Option<i64>) {
    info!(
        user_id = user_id,
        event = event,
        amount = %amount,
        counterparty = counterparty,
        "Ledger event recorded"
    );
}

/// Log a withdrawal request that needs manual processing
pub fn log_withdraw_request(request_id: i64, user_id: i64, amount: Decimal) {
    warn!(
        request_id = request_id,
        user_id = user_id,
        amount = %amount,
        "Withdraw request awaiting manual processing"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}
