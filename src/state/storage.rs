//! State storage implementation
//!
//! This module handles persistence of conversation state: serialization,
//! expiration and cleanup. Redis backs the running bot; the in-memory
//! adapter backs tests and single-process runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, error, warn};
use crate::config::RedisConfig;
use crate::utils::errors::{ReferralBotError, Result};
use super::context::ConversationContext;

/// Persistence port for per-user conversation contexts
#[async_trait]
pub trait StateStorage: Send + Sync {
    async fn save_context(&self, context: &ConversationContext) -> Result<()>;

    /// Load a context; expired contexts are removed and reported as absent
    async fn load_context(&self, user_id: i64) -> Result<Option<ConversationContext>>;

    async fn delete_context(&self, user_id: i64) -> Result<()>;
}

/// Redis-based state storage
#[derive(Clone)]
pub struct RedisStateStorage {
    connection_manager: redis::aio::ConnectionManager,
    config: RedisConfig,
}

impl RedisStateStorage {
    /// Create a new state storage instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    fn context_key(&self, user_id: i64) -> String {
        format!("{}context:{}", self.config.prefix, user_id)
    }

    fn ttl_for(&self, context: &ConversationContext) -> u64 {
        match context.remaining_ttl() {
            Some(seconds) => seconds.max(1) as u64,
            None => self.config.ttl_seconds,
        }
    }
}

#[async_trait]
impl StateStorage for RedisStateStorage {
    async fn save_context(&self, context: &ConversationContext) -> Result<()> {
        let key = self.context_key(context.user_id);
        let serialized = serde_json::to_string(context)?;
        let ttl_seconds = self.ttl_for(context);

        let mut conn = self.connection_manager.clone();
        if let Err(e) = conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            error!(user_id = context.user_id, error = %e, "Failed to save context to Redis");
            return Err(e.into());
        }

        debug!(user_id = context.user_id, key = %key, scenario = ?context.scenario,
               step = ?context.step, ttl_seconds = ttl_seconds, "Context saved to Redis");
        Ok(())
    }

    async fn load_context(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        let key = self.context_key(user_id);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = conn.get(&key).await?;
        let Some(data) = serialized else {
            debug!(user_id = user_id, "No context found in Redis");
            return Ok(None);
        };

        let context: ConversationContext = match serde_json::from_str(&data) {
            Ok(context) => context,
            Err(e) => {
                warn!(user_id = user_id, error = %e, "Dropping undecodable context");
                self.delete_context(user_id).await?;
                return Ok(None);
            }
        };

        if context.is_expired() {
            warn!(user_id = user_id, expires_at = ?context.expires_at, "Context has expired, removing");
            self.delete_context(user_id).await?;
            return Ok(None);
        }

        Ok(Some(context))
    }

    async fn delete_context(&self, user_id: i64) -> Result<()> {
        let key = self.context_key(user_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        debug!(user_id = user_id, deleted = deleted > 0, "Context delete");
        Ok(())
    }
}

/// Process-local state storage
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStorage {
    contexts: Arc<Mutex<HashMap<i64, ConversationContext>>>,
}

impl InMemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_contexts<T>(&self, f: impl FnOnce(&mut HashMap<i64, ConversationContext>) -> T) -> Result<T> {
        let mut contexts = self
            .contexts
            .lock()
            .map_err(|_| ReferralBotError::InvalidInput("state lock poisoned".to_string()))?;
        Ok(f(&mut contexts))
    }
}

#[async_trait]
impl StateStorage for InMemoryStateStorage {
    async fn save_context(&self, context: &ConversationContext) -> Result<()> {
        self.with_contexts(|contexts| {
            contexts.insert(context.user_id, context.clone());
        })
    }

    async fn load_context(&self, user_id: i64) -> Result<Option<ConversationContext>> {
        self.with_contexts(|contexts| match contexts.get(&user_id) {
            Some(context) if context.is_expired() => {
                contexts.remove(&user_id);
                None
            }
            other => other.cloned(),
        })
    }

    async fn delete_context(&self, user_id: i64) -> Result<()> {
        self.with_contexts(|contexts| {
            contexts.remove(&user_id);
        })
    }
}
