use async_trait::async_trait;
use glossa_types::{DictionaryEntry, LanguageRules};

pub mod client;
pub mod grammar;
pub mod reflexive;
pub mod retry;
pub mod senses;

pub use client::FreeDictionaryClient;
pub use grammar::{extract_grammar, extract_grammar_for_label};
pub use reflexive::strip_reflexive;
pub use retry::RetryPolicy;
pub use senses::{build_sense_listing, get_sense, is_trivial, parse_sense_label};

/// External dictionary source
#[async_trait]
pub trait DictionaryProvider: Send + Sync {
    /// All entries for `word`, or `None` when the source has nothing.
    ///
    /// An empty entry list is reported as `None`.
    async fn fetch(
        &self,
        word: &str,
        language: &LanguageRules,
    ) -> Result<Option<Vec<DictionaryEntry>>, DictionaryError>;

    /// Source name for logs
    fn name(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid dictionary URL: {0}")]
    InvalidUrl(String),
}

impl DictionaryError {
    /// Failures worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, DictionaryError::Timeout | DictionaryError::Connection(_))
    }
}
