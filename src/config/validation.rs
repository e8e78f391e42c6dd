//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use rust_decimal::Decimal;
use crate::utils::errors::{ReferralBotError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_payment_config(&settings.payment)?;
    validate_ledger_config(&settings.ledger)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(ReferralBotError::Config(
            "Bot token is required".to_string()
        ));
    }

    if config.admin_id == 0 {
        return Err(ReferralBotError::Config(
            "Admin ID must be configured".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ReferralBotError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(ReferralBotError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(ReferralBotError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ReferralBotError::Config(
            "Redis URL is required".to_string()
        ));
    }

    if config.ttl_seconds == 0 {
        return Err(ReferralBotError::Config(
            "Redis TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate payment provider configuration
fn validate_payment_config(config: &super::PaymentConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(ReferralBotError::Config(
            "Crypto Pay token is required".to_string()
        ));
    }

    if config.api_url.is_empty() {
        return Err(ReferralBotError::Config(
            "Crypto Pay API URL is required".to_string()
        ));
    }

    if config.asset.is_empty() {
        return Err(ReferralBotError::Config(
            "Payment asset is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(ReferralBotError::Config(
            "Payment timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate ledger constants
fn validate_ledger_config(config: &super::LedgerConfig) -> Result<()> {
    let positive = [
        ("activation_price", config.activation_price),
        ("level1_bonus", config.level1_bonus),
        ("level2_bonus", config.level2_bonus),
        ("min_withdraw", config.min_withdraw),
    ];

    for (name, value) in positive {
        if value <= Decimal::ZERO {
            return Err(ReferralBotError::Config(
                format!("Ledger constant {} must be greater than 0", name)
            ));
        }
    }

    if config.level2_bonus >= config.level1_bonus {
        return Err(ReferralBotError::Config(
            "Level-2 bonus must be smaller than level-1 bonus".to_string()
        ));
    }

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(ReferralBotError::Config(
            "Default language is required".to_string()
        ));
    }

    if config.supported_languages.is_empty() {
        return Err(ReferralBotError::Config(
            "At least one supported language is required".to_string()
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(ReferralBotError::Config(
            "Default language must be in supported languages list".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ReferralBotError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ReferralBotError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
