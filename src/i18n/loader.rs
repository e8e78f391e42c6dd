//! Translation loader and i18n management
//!
//! This module provides translation loading, language detection and message
//! formatting. Lookups never fail: a missing key falls back to the default
//! language and, last, to the key itself.

use std::collections::HashMap;
use std::path::Path;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, error, info, warn};
use crate::config::I18nConfig;
use crate::utils::errors::{ReferralBotError, Result};

/// Directory translation files are read from by default
pub const TRANSLATIONS_DIR: &str = "translations";

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Loaded translations by language code
    translations: HashMap<String, Map<String, Value>>,
    default_language: String,
    supported_languages: Vec<String>,
}

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

impl I18n {
    /// Create a new I18n instance
    pub fn new(config: &I18nConfig) -> Self {
        Self {
            translations: HashMap::new(),
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
        }
    }

    /// Load all translation files from the translations directory
    pub async fn load_translations(&mut self) -> Result<()> {
        self.load_translations_from(Path::new(TRANSLATIONS_DIR)).await
    }

    /// Load `<lang>.json` for every supported language from `dir`
    ///
    /// Only the default language is mandatory.
    pub async fn load_translations_from(&mut self, dir: &Path) -> Result<()> {
        let supported_languages = self.supported_languages.clone();
        for lang_code in &supported_languages {
            let file_path = dir.join(format!("{}.json", lang_code));

            let loaded = if file_path.exists() {
                self.load_language_file(&file_path, lang_code).await
            } else {
                Err(ReferralBotError::Config(format!(
                    "Translation file not found: {}",
                    file_path.display()
                )))
            };

            match loaded {
                Ok(count) => info!(language = %lang_code, keys = count, "Loaded translations"),
                Err(e) if lang_code == &self.default_language => {
                    error!(language = %lang_code, error = %e, "Failed to load default language");
                    return Err(ReferralBotError::Config(format!(
                        "Failed to load default language translations: {}",
                        e
                    )));
                }
                Err(e) => warn!(language = %lang_code, error = %e, "Skipping language"),
            }
        }

        Ok(())
    }

    async fn load_language_file(&mut self, file_path: &Path, lang_code: &str) -> Result<usize> {
        let content = fs::read_to_string(file_path).await?;
        self.insert_language(lang_code, serde_json::from_str(&content)?)
    }

    /// Register translations for a language from an already parsed JSON object
    pub fn insert_language(&mut self, lang_code: &str, translations: Value) -> Result<usize> {
        let Value::Object(map) = translations else {
            return Err(ReferralBotError::Config(format!(
                "Invalid translation file format for {}",
                lang_code
            )));
        };

        let count = map.len();
        self.translations.insert(lang_code.to_string(), map);
        Ok(count)
    }

    /// Get a translated message
    pub fn t(&self, key: &str, lang: &str, params: Option<&TranslationParams>) -> String {
        let effective_lang = self.get_effective_language(lang);

        let text = self
            .get_translation_value(key, &effective_lang)
            .or_else(|| self.get_translation_value(key, &self.default_language));

        match text {
            Some(text) => self.format_message(&text, params),
            None => {
                warn!(key = %key, language = %effective_lang, "Translation key not found");
                key.to_string()
            }
        }
    }

    /// Build parameters from `(name, value)` pairs
    pub fn params<const N: usize>(pairs: [(&str, String); N]) -> TranslationParams {
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.supported_languages.iter().any(|l| l == lang)
    }

    /// Get the effective language (fallback to default if not supported)
    fn get_effective_language(&self, lang: &str) -> String {
        if self.is_language_supported(lang) && self.translations.contains_key(lang) {
            lang.to_string()
        } else {
            self.default_language.clone()
        }
    }

    /// Get translation text, supporting nested keys like "menu.unlock"
    fn get_translation_value(&self, key: &str, lang: &str) -> Option<String> {
        let translations = self.translations.get(lang)?;
        let mut parts = key.split('.');
        let mut current = translations.get(parts.next()?)?;

        for part in parts {
            current = current.get(part)?;
        }

        match current {
            Value::String(s) => Some(s.clone()),
            Value::Array(lines) => Some(
                lines
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            other => {
                debug!(key = %key, "Translation value is not text");
                Some(other.to_string())
            }
        }
    }

    /// Format message with parameters
    fn format_message(&self, template: &str, params: Option<&TranslationParams>) -> String {
        if let Some(params) = params {
            let mut result = template.to_string();
            for (key, value) in params {
                let placeholder = format!("{{{}}}", key);
                result = result.replace(&placeholder, value);
            }
            result
        } else {
            template.to_string()
        }
    }

    /// Get default language
    pub fn default_language(&self) -> &str {
        &self.default_language
    }
}
