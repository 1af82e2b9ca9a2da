use async_trait::async_trait;
use glossa_types::WordAnalysis;

/// Parser-backed analysis of a clicked word in its sentence
#[async_trait]
pub trait LinguisticAnalyzer: Send + Sync {
    /// ISO 639-1 code of the language this analyzer handles
    fn language_code(&self) -> &str;

    /// Analysis of the token matching `word`, or `None` when the sentence
    /// could not be parsed or no token matches. Failures are logged by the
    /// implementation.
    async fn extract(&self, word: &str, sentence: &str) -> Option<WordAnalysis>;
}
