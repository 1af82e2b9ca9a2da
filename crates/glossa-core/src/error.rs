use glossa_dictionary::DictionaryError;

/// Why the hybrid path gave up. Every variant leads to the full-LLM fallback.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No language rules for '{0}'")]
    UnsupportedLanguage(String),

    #[error("Nothing left of the word after cleaning")]
    EmptyWord,

    #[error("Lemma could not be resolved")]
    LemmaUnresolved,

    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("Dictionary lookup exceeded its time budget")]
    DictionaryTimeout,

    #[error("Dictionary has no entries for '{0}'")]
    NoEntries(String),

    #[error("Selected sense has no definition")]
    NoDefinition,
}

/// Log a failed LLM call at the level its kind deserves
pub(crate) fn log_llm_failure(stage: &str, error: &glossa_llm::LlmError) {
    if error.is_contract_violation() {
        tracing::error!(stage, error = %error, "LLM called with an invalid request");
    } else {
        tracing::warn!(stage, error = %error, "LLM call failed");
    }
}
