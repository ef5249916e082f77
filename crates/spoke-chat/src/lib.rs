//! Chat engine for Spoke.
//!
//! Provides a bounded conversational session on top of the OpenAI
//! chat-completion API with:
//! - A pinned system message and FIFO context trimming
//! - Retry with bounded exponential backoff for transient failures
//! - A validated, immutable session configuration

pub mod config;
pub mod dispatch;
pub mod openai;
pub mod prompts;
pub mod session;

use async_trait::async_trait;

pub use config::SessionConfig;
pub use dispatch::{RetryPolicy, RetryingDispatcher};
pub use openai::OpenAiClient;
pub use session::ChatSession;

/// A chat-completion backend. Implemented by [`OpenAiClient`]; test code
/// substitutes scripted stubs.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, ChatError>;
}

/// Per-call parameters for one completion request.
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ChatError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("rate limited")]
    RateLimited,
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("session is busy with another request")]
    Busy,
}

impl ChatError {
    /// Whether a retry can plausibly succeed. Rate limits, transport
    /// failures, timeouts, and 5xx responses are transient; everything
    /// else (bad credential, malformed request, local errors) is not.
    pub fn is_transient(&self) -> bool {
        match self {
            ChatError::RateLimited | ChatError::Network(_) | ChatError::Timeout => true,
            ChatError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
