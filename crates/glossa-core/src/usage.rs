use async_trait::async_trait;
use glossa_types::CallStats;
use serde::{Deserialize, Serialize};

/// Which stage spent the tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    LemmaExtraction,
    LevelEstimation,
    SenseSelection,
    FullLlmLookup,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::LemmaExtraction => "lemma_extraction",
            Operation::LevelEstimation => "level_estimation",
            Operation::SenseSelection => "sense_selection",
            Operation::FullLlmLookup => "full_llm_lookup",
        }
    }
}

/// Stats of one LLM call that returned, tagged with its stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub operation: Operation,
    pub stats: CallStats,
}

impl UsageRecord {
    pub fn new(operation: Operation, stats: CallStats) -> Self {
        Self { operation, stats }
    }
}

/// Destination for token usage, driven by the caller after a lookup
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, user_id: Option<&str>, record: &UsageRecord);
}
