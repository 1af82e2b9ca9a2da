use serde::{Deserialize, Serialize};

use crate::{env_or, env_string};

fn default_base_url() -> String {
    "https://freedictionaryapi.com/api/v1".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    1000
}

fn default_max_backoff() -> u64 {
    4000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request HTTP timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Attempts on timeout/connection failure, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

impl DictionaryConfig {
    pub fn new() -> Self {
        Self {
            base_url: env_string("GLOSSA_DICTIONARY_URL", default_base_url()),
            timeout_secs: env_or("GLOSSA_DICTIONARY_TIMEOUT_SECS", default_timeout()),
            max_attempts: env_or("GLOSSA_DICTIONARY_MAX_ATTEMPTS", default_max_attempts()),
            initial_backoff_ms: env_or(
                "GLOSSA_DICTIONARY_INITIAL_BACKOFF_MS",
                default_initial_backoff(),
            ),
            max_backoff_ms: env_or("GLOSSA_DICTIONARY_MAX_BACKOFF_MS", default_max_backoff()),
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}
