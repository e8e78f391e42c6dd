//! Error handling for ReferralBot
//!
//! This module defines the main error types used throughout the application.
//! Business outcomes such as "payment not received" or "balance below the
//! withdrawal minimum" are not errors; they are returned as outcome enums by
//! the services. Everything here is an infrastructure or input failure.

use thiserror::Error;

/// Main error type for ReferralBot application
#[derive(Error, Debug)]
pub enum ReferralBotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Payment provider error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Crypto Pay API specific errors
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment API request failed: {0}")]
    RequestFailed(String),

    #[error("Payment API timeout")]
    Timeout,

    #[error("Payment API returned an error: {code} {name}")]
    Api { code: u16, name: String },

    #[error("Invalid payment API response: {0}")]
    InvalidResponse(String),

    #[error("Payment service unavailable")]
    ServiceUnavailable,
}

/// Result type alias for ReferralBot operations
pub type Result<T> = std::result::Result<T, ReferralBotError>;

/// Result type alias for payment provider operations
pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

impl ReferralBotError {
    /// Check if the error is recoverable by retrying the triggering action
    pub fn is_recoverable(&self) -> bool {
        match self {
            ReferralBotError::Database(_) => false,
            ReferralBotError::Migration(_) => false,
            ReferralBotError::Telegram(_) => true,
            ReferralBotError::Payment(_) => true,
            ReferralBotError::Config(_) => false,
            ReferralBotError::UserNotFound { .. } => false,
            ReferralBotError::Redis(_) => true,
            ReferralBotError::Http(_) => true,
            ReferralBotError::Serialization(_) => false,
            ReferralBotError::Io(_) => true,
            ReferralBotError::UrlParse(_) => false,
            ReferralBotError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReferralBotError::Database(_) => ErrorSeverity::Critical,
            ReferralBotError::Migration(_) => ErrorSeverity::Critical,
            ReferralBotError::Config(_) => ErrorSeverity::Critical,
            ReferralBotError::Payment(_) => ErrorSeverity::Warning,
            ReferralBotError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
