use std::sync::Arc;

use glossa_dictionary::{DictionaryProvider, extract_grammar};
use glossa_llm::LlmClient;
use glossa_types::{LanguageRules, LookupRequest, LookupResult, LookupSource, rules_for};
use serde::Serialize;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::analyzer::LinguisticAnalyzer;
use crate::error::PipelineError;
use crate::fallback::FullLlmFallback;
use crate::lemma::LemmaResolver;
use crate::preprocess::{clean_sentence, clean_word};
use crate::senses::SenseSelector;
use crate::settings::PipelineSettings;
use crate::usage::{Operation, UsageRecord};

/// Lookup result plus token usage for the caller to forward
#[derive(Debug, Clone, Serialize)]
pub struct LookupOutcome {
    pub result: LookupResult,
    pub usage: Vec<UsageRecord>,
}

/// Hybrid word lookup with a single-call LLM fallback.
///
/// Stages run strictly in order: lemma, dictionary, sense, grammar. The
/// first stage without a usable result hands the request to the fallback,
/// so [`lookup`](Self::lookup) always produces a result.
pub struct LookupPipeline {
    resolver: LemmaResolver,
    dictionary: Arc<dyn DictionaryProvider>,
    selector: SenseSelector,
    fallback: FullLlmFallback,
    settings: PipelineSettings,
}

impl LookupPipeline {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        dictionary: Arc<dyn DictionaryProvider>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            resolver: LemmaResolver::new(
                llm.clone(),
                settings.fast_model.clone(),
                settings.lemma_timeout,
            ),
            dictionary,
            selector: SenseSelector::new(
                llm.clone(),
                settings.fast_model.clone(),
                settings.sense_timeout,
            ),
            fallback: FullLlmFallback::new(
                llm,
                settings.fallback_model.clone(),
                settings.fallback_timeout,
            ),
            settings,
        }
    }

    /// Register a parser-backed analyzer for its language
    pub fn with_analyzer(mut self, analyzer: Arc<dyn LinguisticAnalyzer>) -> Self {
        self.resolver = self.resolver.with_analyzer(analyzer);
        self
    }

    pub async fn lookup(&self, request: &LookupRequest) -> LookupOutcome {
        let span = info_span!(
            "lookup",
            lookup_id = %Uuid::new_v4(),
            word = %request.word,
            language = %request.language
        );

        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &LookupRequest) -> LookupOutcome {
        let word = clean_word(&request.word);
        let sentence = clean_sentence(&request.sentence);
        let rules = rules_for(&request.language);
        let mut usage = Vec::new();

        match self
            .hybrid(&word, &sentence, &request.language, rules, &mut usage)
            .await
        {
            Ok(result) => {
                info!(lemma = %result.lemma, source = result.source.as_str(), "Lookup complete");
                LookupOutcome { result, usage }
            }
            Err(reason) => {
                warn!(%reason, "Hybrid lookup failed, using full LLM lookup");
                // Punctuation-only clicks keep their raw text as the lemma
                let fallback_word: &str = if word.is_empty() { request.word.trim() } else { &word };
                let (result, stats) = self
                    .fallback
                    .lookup(fallback_word, &sentence, &request.language, rules)
                    .await;
                if let Some(stats) = stats {
                    usage.push(UsageRecord::new(Operation::FullLlmLookup, stats));
                }
                info!(lemma = %result.lemma, source = result.source.as_str(), "Lookup complete");
                LookupOutcome { result, usage }
            }
        }
    }

    async fn hybrid(
        &self,
        word: &str,
        sentence: &str,
        language: &str,
        rules: Option<&'static LanguageRules>,
        usage: &mut Vec<UsageRecord>,
    ) -> Result<LookupResult, PipelineError> {
        let rules = rules.ok_or_else(|| PipelineError::UnsupportedLanguage(language.to_string()))?;
        if word.is_empty() {
            return Err(PipelineError::EmptyWord);
        }

        let resolution = self.resolver.resolve(word, sentence, language).await;
        usage.extend(resolution.usage);
        let lemma = resolution.lemma.ok_or(PipelineError::LemmaUnresolved)?;
        debug!(lemma = %lemma.lemma, "Lemma resolved");

        let entries = tokio::time::timeout(
            self.settings.dictionary_timeout,
            self.dictionary.fetch(&lemma.lemma, rules),
        )
        .await
        .map_err(|_| PipelineError::DictionaryTimeout)??
        .ok_or_else(|| PipelineError::NoEntries(lemma.lemma.clone()))?;
        debug!(
            source = self.dictionary.name(),
            entries = entries.len(),
            "Dictionary entries fetched"
        );

        let selection = self.selector.select(sentence, word, &entries).await;
        if let Some(stats) = selection.stats.clone() {
            usage.push(UsageRecord::new(Operation::SenseSelection, stats));
        }

        let definition = selection
            .sense
            .definition
            .ok_or(PipelineError::NoDefinition)?;

        let grammar = entries
            .get(selection.index.entry)
            .map(|entry| extract_grammar(entry, rules))
            .unwrap_or_default();

        Ok(LookupResult {
            lemma: lemma.lemma,
            definition,
            related_words: lemma.related_words,
            level: lemma.level,
            pos: grammar.pos,
            gender: grammar.gender,
            phonetics: grammar.phonetics,
            conjugations: grammar.conjugations,
            examples: selection.sense.examples,
            source: LookupSource::Hybrid,
        })
    }
}
