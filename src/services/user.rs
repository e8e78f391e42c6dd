//! User service implementation
//!
//! This service handles user registration with referrer validation, language
//! preferences and the read-only views behind the balance and stats screens.

use std::sync::Arc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use crate::config::I18nConfig;
use crate::database::LedgerStore;
use crate::models::{CreateUserRequest, ReferralStats, User};
use crate::utils::errors::{ReferralBotError, Result};

/// Result of a `/start`
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub user: User,
    /// False when the user already existed; nothing was changed then
    pub created: bool,
}

/// Balance and referral counters for the stats screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserOverview {
    pub balance: Decimal,
    pub activated: bool,
    pub stats: ReferralStats,
}

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn LedgerStore>,
    i18n: I18nConfig,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(store: Arc<dyn LedgerStore>, i18n: I18nConfig) -> Self {
        Self { store, i18n }
    }

    /// Register a new user or get the existing one
    ///
    /// The referrer candidate is kept only if it differs from the user and is
    /// already registered. Existing users keep their original referrer.
    pub async fn register(
        &self,
        user_id: i64,
        referrer_candidate: Option<i64>,
        language_code: Option<&str>,
    ) -> Result<Registration> {
        if let Some(user) = self.store.find_user(user_id).await? {
            debug!(user_id = user_id, "User already registered");
            return Ok(Registration { user, created: false });
        }

        let referrer_id = self.accept_referrer(user_id, referrer_candidate).await?;
        let request = CreateUserRequest {
            user_id,
            referrer_id,
            language_code: Some(self.normalize_language(language_code)),
        };
        let created = self.store.create_user(request).await?;

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(ReferralBotError::UserNotFound { user_id })?;

        if created {
            info!(user_id = user_id, referrer_id = ?user.referrer_id, "New user registered");
        }
        Ok(Registration { user, created })
    }

    async fn accept_referrer(&self, user_id: i64, candidate: Option<i64>) -> Result<Option<i64>> {
        let Some(referrer_id) = candidate else {
            return Ok(None);
        };

        if referrer_id == user_id {
            warn!(user_id = user_id, "Self-referral ignored");
            return Ok(None);
        }
        if self.store.find_user(referrer_id).await?.is_none() {
            warn!(user_id = user_id, referrer_id = referrer_id, "Unknown referrer ignored");
            return Ok(None);
        }

        Ok(Some(referrer_id))
    }

    /// Stored language of a user, or the default language
    pub async fn language_of(&self, user_id: i64) -> Result<String> {
        Ok(self
            .store
            .find_user(user_id)
            .await?
            .map(|user| user.language_code)
            .unwrap_or_else(|| self.i18n.default_language.clone()))
    }

    pub async fn balance(&self, user_id: i64) -> Result<Decimal> {
        self.store.balance(user_id).await
    }

    pub async fn overview(&self, user_id: i64) -> Result<UserOverview> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(ReferralBotError::UserNotFound { user_id })?;
        let stats = self.store.referral_stats(user_id).await?;

        Ok(UserOverview {
            balance: user.balance,
            activated: user.activated,
            stats,
        })
    }

    /// Map a Telegram language hint to a supported language
    fn normalize_language(&self, language_code: Option<&str>) -> String {
        language_code
            .map(|code| code.split(['-', '_']).next().unwrap_or(code).to_lowercase())
            .filter(|code| self.i18n.supported_languages.contains(code))
            .unwrap_or_else(|| self.i18n.default_language.clone())
    }
}
