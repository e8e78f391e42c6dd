//! State management module
//!
//! This module handles conversation state and user context

pub mod context;
pub mod storage;

// Re-export commonly used state components
pub use context::ConversationContext;
pub use storage::{StateStorage, RedisStateStorage, InMemoryStateStorage};
