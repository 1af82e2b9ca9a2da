use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::analyzer::AnalyzerConfig;
use self::dictionary::DictionaryConfig;
use self::llm::LlmConfig;

pub mod analyzer;
pub mod dictionary;
pub mod llm;

fn default_batch_concurrency() -> usize {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub dictionary: DictionaryConfig,
    pub analyzer: AnalyzerConfig,

    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub log_json: bool,
    /// Lookups allowed in flight at once in batch mode
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

impl Config {
    pub fn new() -> Self {
        let log_json = env_or("GLOSSA_LOG_JSON", false);
        let batch_concurrency =
            env_or("GLOSSA_BATCH_CONCURRENCY", default_batch_concurrency()).max(1);

        Config {
            llm: LlmConfig::new(),
            dictionary: DictionaryConfig::new(),
            analyzer: AnalyzerConfig::new(),

            log_json,
            batch_concurrency,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            llm: LlmConfig::default(),
            dictionary: DictionaryConfig::default(),
            analyzer: AnalyzerConfig::default(),

            log_json: false,
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

/// Parse an environment variable, keeping `default` when unset or malformed
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_string(key: &str, default: impl Into<String>) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.into())
}
