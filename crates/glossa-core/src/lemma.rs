use std::sync::Arc;
use std::time::Duration;

use glossa_llm::json::{parse_lenient, string_field, string_list_field};
use glossa_llm::{LlmClient, LlmRequest};
use glossa_types::{CefrLevel, LemmaResult, WordAnalysis, rules_for};
use serde_json::Value;
use tracing::{debug, warn};

use crate::analyzer::LinguisticAnalyzer;
use crate::error::log_llm_failure;
use crate::preprocess::order_by_sentence;
use crate::prompts;
use crate::usage::{Operation, UsageRecord};

/// STTS tag of an article
const ARTICLE_TAG: &str = "ART";
/// Endings of participles that the parser lemmatises as adjectives
const PARTICIPLE_ENDINGS: &[&str] = &["en", "ern", "eln"];

const LEMMA_MAX_TOKENS: u32 = 150;
const LEVEL_MAX_TOKENS: u32 = 5;

/// Lemma plus the stats of every LLM call that returned while resolving it
#[derive(Debug, Clone, Default)]
pub struct LemmaResolution {
    pub lemma: Option<LemmaResult>,
    pub usage: Vec<UsageRecord>,
}

/// Resolves a clicked word to its dictionary form.
///
/// Languages with a registered [`LinguisticAnalyzer`] use the parse and
/// one level-estimate call; everything else, and any analyzer miss, goes
/// through a reduced LLM prompt.
pub struct LemmaResolver {
    llm: Arc<dyn LlmClient>,
    analyzers: Vec<Arc<dyn LinguisticAnalyzer>>,
    model: String,
    timeout: Duration,
}

impl LemmaResolver {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            llm,
            analyzers: Vec::new(),
            model: model.into(),
            timeout,
        }
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn LinguisticAnalyzer>) -> Self {
        self.analyzers.push(analyzer);
        self
    }

    pub async fn resolve(&self, word: &str, sentence: &str, language: &str) -> LemmaResolution {
        if let Some(analyzer) = self.analyzer_for(language) {
            match analyzer.extract(word, sentence).await {
                Some(analysis) => {
                    if let Some((lemma, related)) = lemma_from_analysis(word, &analysis) {
                        debug!(%lemma, pos = %analysis.pos, "Lemma from analyzer");
                        return self
                            .with_level(word, sentence, language, lemma, related)
                            .await;
                    }
                    warn!(word, "Analyzer returned an empty lemma, using the LLM");
                }
                None => warn!(word, "Analyzer found no matching token, using the LLM"),
            }
        }

        self.from_llm(word, sentence, language).await
    }

    fn analyzer_for(&self, language: &str) -> Option<&Arc<dyn LinguisticAnalyzer>> {
        let code = rules_for(language)?.code;
        self.analyzers.iter().find(|a| a.language_code() == code)
    }

    async fn with_level(
        &self,
        word: &str,
        sentence: &str,
        language: &str,
        lemma: String,
        related: Vec<String>,
    ) -> LemmaResolution {
        let messages = prompts::level_messages(word, sentence, &lemma, language);
        let request = LlmRequest::new(self.model.as_str(), messages, self.timeout)
            .max_tokens(LEVEL_MAX_TOKENS)
            .temperature(0.0);

        let mut usage = Vec::new();
        let level = match self.llm.call(request).await {
            Ok(response) => {
                usage.push(UsageRecord::new(Operation::LevelEstimation, response.stats));
                CefrLevel::parse(&response.content)
            }
            Err(e) => {
                log_llm_failure("level_estimation", &e);
                None
            }
        };

        LemmaResolution {
            lemma: Some(LemmaResult {
                lemma,
                related_words: Some(related),
                level,
            }),
            usage,
        }
    }

    async fn from_llm(&self, word: &str, sentence: &str, language: &str) -> LemmaResolution {
        let messages = prompts::lemma_messages(word, sentence, language);
        let request = LlmRequest::new(self.model.as_str(), messages, self.timeout)
            .max_tokens(LEMMA_MAX_TOKENS)
            .temperature(0.0);

        let response = match self.llm.call(request).await {
            Ok(response) => response,
            Err(e) => {
                log_llm_failure("lemma_extraction", &e);
                return LemmaResolution::default();
            }
        };

        let lemma = parse_lemma_reply(&response.content, sentence);
        if lemma.is_none() {
            warn!(reply = %response.content, "Lemma reply unusable after JSON repair");
        }

        LemmaResolution {
            lemma,
            usage: vec![UsageRecord::new(Operation::LemmaExtraction, response.stats)],
        }
    }
}

/// Apply the parse-based lemma rules, first match wins:
/// articles and participial adjectives keep their lowercased surface form,
/// other non-verbs take the parser lemma, and verbs are rebuilt from their
/// base, separable prefix and reflexive pronoun.
pub fn lemma_from_analysis(word: &str, analysis: &WordAnalysis) -> Option<(String, Vec<String>)> {
    let clicked = vec![word.to_string()];

    if analysis.xpos == ARTICLE_TAG {
        return Some((analysis.text.to_lowercase(), clicked));
    }

    let base = analysis.lemma.trim();
    if base.is_empty() || base == "_" {
        return None;
    }

    if analysis.pos == "ADJ" {
        let lowered = base.to_lowercase();
        if PARTICIPLE_ENDINGS.iter().any(|end| lowered.ends_with(end)) {
            return Some((analysis.text.to_lowercase(), clicked));
        }
    }

    if analysis.pos != "VERB" && analysis.pos != "AUX" {
        return Some((base.to_string(), clicked));
    }

    let prefix = analysis.prefix.as_deref().unwrap_or("");
    let lemma = match analysis.reflexive {
        Some(_) => format!("sich {prefix}{base}"),
        None => format!("{prefix}{base}"),
    };

    let related = if analysis.parts.is_empty() {
        clicked
    } else {
        analysis.parts.clone()
    };

    Some((lemma, related))
}

fn parse_lemma_reply(content: &str, sentence: &str) -> Option<LemmaResult> {
    let value: Value = parse_lenient(content)?;
    let lemma = string_field(&value, "lemma")?;

    Some(LemmaResult {
        lemma,
        related_words: string_list_field(&value, "related_words")
            .map(|words| order_by_sentence(words, sentence)),
        level: string_field(&value, "level").and_then(|level| CefrLevel::parse(&level)),
    })
}
