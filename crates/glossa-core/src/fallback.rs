use std::sync::Arc;
use std::time::Duration;

use glossa_llm::json::{parse_lenient, string_field, string_list_field, string_map_field};
use glossa_llm::{LlmClient, LlmRequest};
use glossa_types::{CallStats, CefrLevel, LanguageRules, LookupResult, LookupSource};
use serde_json::Value;
use tracing::warn;

use crate::error::log_llm_failure;
use crate::preprocess::order_by_sentence;
use crate::prompts;

/// Definition used when the model gave nothing usable
pub const NOT_FOUND_DEFINITION: &str = "Definition not found";
/// Longest raw reply that is still shown as a definition
const RAW_DEFINITION_MAX_CHARS: usize = 200;

const FALLBACK_MAX_TOKENS: u32 = 2000;

/// Whole lookup in one LLM call. Never fails.
pub struct FullLlmFallback {
    llm: Arc<dyn LlmClient>,
    model: String,
    timeout: Duration,
}

impl FullLlmFallback {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            llm,
            model: model.into(),
            timeout,
        }
    }

    pub async fn lookup(
        &self,
        word: &str,
        sentence: &str,
        language: &str,
        rules: Option<&LanguageRules>,
    ) -> (LookupResult, Option<CallStats>) {
        let request = LlmRequest::new(
            self.model.as_str(),
            prompts::fallback_messages(word, sentence, language, rules),
            self.timeout,
        )
        .max_tokens(FALLBACK_MAX_TOKENS)
        .temperature(0.0);

        match self.llm.call(request).await {
            Ok(response) => (
                build_result(word, sentence, &response.content, rules),
                Some(response.stats),
            ),
            Err(e) => {
                log_llm_failure("full_llm_lookup", &e);
                (placeholder(word, None), None)
            }
        }
    }
}

/// Turn a fallback reply into a result; unparseable replies degrade to a
/// placeholder carrying the raw text when it is short enough to read.
pub fn build_result(
    word: &str,
    sentence: &str,
    content: &str,
    rules: Option<&LanguageRules>,
) -> LookupResult {
    let Some(value) = parse_lenient::<Value>(content).filter(Value::is_object) else {
        warn!(word, "Fallback reply is not JSON");
        return placeholder(word, Some(content));
    };

    LookupResult {
        lemma: string_field(&value, "lemma").unwrap_or_else(|| word.to_string()),
        definition: string_field(&value, "definition")
            .unwrap_or_else(|| NOT_FOUND_DEFINITION.to_string()),
        related_words: string_list_field(&value, "related_words")
            .map(|words| order_by_sentence(words, sentence)),
        level: string_field(&value, "level").and_then(|level| CefrLevel::parse(&level)),
        pos: string_field(&value, "pos"),
        gender: string_field(&value, "gender").and_then(|g| gender_article(&g, rules)),
        // Not requested from the model
        phonetics: None,
        conjugations: string_map_field(&value, "conjugations"),
        examples: Vec::new(),
        source: LookupSource::Llm,
    }
}

/// Keep a gender only in the language's own article form
fn gender_article(raw: &str, rules: Option<&LanguageRules>) -> Option<String> {
    let rules = rules.filter(|r| r.has_gender())?;
    let raw = raw.trim().to_lowercase();

    if rules.is_article(&raw) {
        Some(raw)
    } else {
        rules.article_for(&raw).map(str::to_string)
    }
}

fn placeholder(word: &str, raw: Option<&str>) -> LookupResult {
    let definition = raw
        .map(str::trim)
        .filter(|text| !text.is_empty() && text.chars().count() <= RAW_DEFINITION_MAX_CHARS)
        .unwrap_or(NOT_FOUND_DEFINITION);

    LookupResult {
        lemma: word.to_string(),
        definition: definition.to_string(),
        related_words: None,
        level: None,
        pos: None,
        gender: None,
        phonetics: None,
        conjugations: None,
        examples: Vec::new(),
        source: LookupSource::Llm,
    }
}
