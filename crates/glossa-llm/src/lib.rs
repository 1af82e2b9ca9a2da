use std::time::Duration;

use glossa_types::CallStats;
use serde::{Deserialize, Serialize};

pub mod json;
pub mod openai;
pub mod pricing;

pub use openai::OpenAiClient;

/// Chat-completion provider interface
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion. An empty message list is a caller bug and fails
    /// with [`LlmError::EmptyMessages`] before any I/O.
    async fn call(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
}

#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>, timeout: Duration) -> Self {
        Self {
            messages,
            model: model.into(),
            timeout,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub stats: CallStats,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty message list passed to LLM")]
    EmptyMessages,
}

impl LlmError {
    /// Caller misuse rather than provider flakiness
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, LlmError::EmptyMessages)
    }
}
