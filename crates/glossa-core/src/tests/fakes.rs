use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use glossa_dictionary::{DictionaryError, DictionaryProvider};
use glossa_llm::{LlmClient, LlmError, LlmRequest, LlmResponse, ProviderMetadata};
use glossa_types::{CallStats, DictionaryEntry, LanguageRules, Sense, WordAnalysis};

use crate::analyzer::LinguisticAnalyzer;
use crate::settings::PipelineSettings;

/// LLM answering from a fixed script, one reply per call
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<LlmRequest>>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn replying(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn call(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        if request.messages.is_empty() {
            return Err(LlmError::EmptyMessages);
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::ApiError("script exhausted".to_string())))?;

        Ok(LlmResponse {
            content: reply,
            stats: CallStats {
                model,
                prompt_tokens: 40,
                completion_tokens: 4,
                total_tokens: 44,
                cost_usd: 0.0,
                latency_ms: 1,
            },
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "scripted".to_string(),
            base_url: "memory://".to_string(),
        }
    }
}

pub enum DictionaryBehavior {
    Entries(HashMap<String, Vec<DictionaryEntry>>),
    Fail,
    Hang,
}

/// Dictionary backed by a map, or failing on demand
pub struct MemoryDictionary {
    behavior: DictionaryBehavior,
    fetched: Mutex<Vec<String>>,
}

impl MemoryDictionary {
    pub fn new(behavior: DictionaryBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            fetched: Mutex::new(Vec::new()),
        })
    }

    pub fn with(word: &str, entries: Vec<DictionaryEntry>) -> Arc<Self> {
        Self::new(DictionaryBehavior::Entries(HashMap::from([(
            word.to_string(),
            entries,
        )])))
    }

    pub fn empty() -> Arc<Self> {
        Self::new(DictionaryBehavior::Entries(HashMap::new()))
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl DictionaryProvider for MemoryDictionary {
    async fn fetch(
        &self,
        word: &str,
        _language: &LanguageRules,
    ) -> Result<Option<Vec<DictionaryEntry>>, DictionaryError> {
        self.fetched.lock().unwrap().push(word.to_string());

        match &self.behavior {
            DictionaryBehavior::Entries(map) => {
                Ok(map.get(word).filter(|entries| !entries.is_empty()).cloned())
            }
            DictionaryBehavior::Fail => Err(DictionaryError::Api("HTTP 500".to_string())),
            DictionaryBehavior::Hang => {
                std::future::pending::<()>().await;
                Ok(None)
            }
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Analyzer returning the same analysis for every request
pub struct CannedAnalyzer {
    analysis: Option<WordAnalysis>,
    calls: AtomicUsize,
}

impl CannedAnalyzer {
    pub fn new(analysis: Option<WordAnalysis>) -> Arc<Self> {
        Arc::new(Self {
            analysis,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinguisticAnalyzer for CannedAnalyzer {
    fn language_code(&self) -> &str {
        "de"
    }

    async fn extract(&self, _word: &str, _sentence: &str) -> Option<WordAnalysis> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.analysis.clone()
    }
}

/// "stellte" in "Er stellte seinen Freund vor."
pub fn stellte_analysis() -> WordAnalysis {
    WordAnalysis {
        text: "stellte".to_string(),
        lemma: "stellen".to_string(),
        pos: "VERB".to_string(),
        xpos: "VVFIN".to_string(),
        gender: None,
        prefix: Some("vor".to_string()),
        reflexive: None,
        parts: vec!["stellte".to_string(), "vor".to_string()],
    }
}

pub fn entry(part_of_speech: &str, definitions: &[&str]) -> DictionaryEntry {
    DictionaryEntry {
        part_of_speech: part_of_speech.to_string(),
        senses: definitions.iter().map(|d| Sense::new(*d)).collect(),
        ..Default::default()
    }
}

pub fn settings() -> PipelineSettings {
    PipelineSettings {
        fast_model: "fast-model".to_string(),
        fallback_model: "fallback-model".to_string(),
        lemma_timeout: Duration::from_secs(1),
        sense_timeout: Duration::from_secs(1),
        fallback_timeout: Duration::from_secs(1),
        dictionary_timeout: Duration::from_millis(100),
    }
}

/// One instance of every error kind a provider can report without I/O
pub fn llm_errors() -> Vec<LlmError> {
    vec![
        LlmError::Timeout(Duration::from_secs(15)),
        LlmError::RateLimitExceeded,
        LlmError::AuthenticationError,
        LlmError::ApiError("HTTP 500".to_string()),
        LlmError::InvalidResponse("no choices".to_string()),
        LlmError::EmptyMessages,
    ]
}
