//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub payment: PaymentConfig,
    pub ledger: LedgerConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    /// Recipient of withdrawal notifications
    pub admin_id: i64,
    #[serde(default)]
    pub start_photo: Option<String>,
    #[serde(default)]
    pub how_it_works_photo: Option<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    /// Lifetime of a pending withdrawal intent
    pub ttl_seconds: u64,
}

/// Crypto Pay configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    pub token: String,
    pub api_url: String,
    pub asset: String,
    pub timeout_seconds: u64,
}

/// Activation price, referral bonuses and withdrawal threshold
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    pub activation_price: Decimal,
    pub level1_bonus: Decimal,
    pub level2_bonus: Decimal,
    pub min_withdraw: Decimal,
    #[serde(default)]
    pub require_active_referrer: bool,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    /// Write the rolling file as JSON lines
    #[serde(default)]
    pub json: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Defaults are layered first, then `config.toml` (optional), then
    /// `REFERRALBOT__SECTION__KEY` environment variables.
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("REFERRALBOT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("i18n.supported_languages"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::ReferralBotError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                admin_id: 0,
                start_photo: Some("assets/start.jpg".to_string()),
                how_it_works_photo: Some("assets/how_it_works.jpg".to_string()),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/referralbot".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "referralbot:".to_string(),
                ttl_seconds: 3600,
            },
            payment: PaymentConfig {
                token: String::new(),
                api_url: "https://pay.crypt.bot/api".to_string(),
                asset: "TON".to_string(),
                timeout_seconds: 10,
            },
            ledger: LedgerConfig {
                activation_price: Decimal::new(1, 0),
                level1_bonus: Decimal::new(5, 1),
                level2_bonus: Decimal::new(25, 2),
                min_withdraw: Decimal::new(5, 0),
                require_active_referrer: false,
            },
            i18n: I18nConfig {
                default_language: "en".to_string(),
                supported_languages: vec!["en".to_string(), "ru".to_string()],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
                json: false,
            },
        }
    }
}
