//! Completion gateway - managed text generation behind a trait.
//!
//! The pipeline consumes completions through [`CompletionGateway`]; the
//! REST-backed implementation lives in [`external`], and tests substitute
//! scripted mocks.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod external;

pub use external::ExternalCompletion;

/// Message role in a completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role/content message in an ordered prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Core trait for completion providers.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Generate text for an ordered message list using the given model.
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String>;
}
