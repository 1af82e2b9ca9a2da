use std::env;

use serde::{Deserialize, Serialize};

use crate::{env_or, env_string};

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_lemma_timeout() -> u64 {
    10
}

fn default_sense_timeout() -> u64 {
    15
}

fn default_fallback_timeout() -> u64 {
    30
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model for the cheap calls: lemma, level and sense selection
    #[serde(default = "default_model")]
    pub fast_model: String,
    /// Model for the single-call fallback lookup
    #[serde(default = "default_model")]
    pub fallback_model: String,
    #[serde(default = "default_lemma_timeout")]
    pub lemma_timeout_secs: u64,
    #[serde(default = "default_sense_timeout")]
    pub sense_timeout_secs: u64,
    #[serde(default = "default_fallback_timeout")]
    pub fallback_timeout_secs: u64,
}

impl LlmConfig {
    pub fn new() -> Self {
        let api_key = env::var("GLOSSA_LLM_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .unwrap_or_default();

        Self {
            api_key,
            base_url: env_string("GLOSSA_LLM_BASE_URL", default_base_url()),
            fast_model: env_string("GLOSSA_LLM_FAST_MODEL", default_model()),
            fallback_model: env_string("GLOSSA_LLM_FALLBACK_MODEL", default_model()),
            lemma_timeout_secs: env_or("GLOSSA_LEMMA_TIMEOUT_SECS", default_lemma_timeout()),
            sense_timeout_secs: env_or("GLOSSA_SENSE_TIMEOUT_SECS", default_sense_timeout()),
            fallback_timeout_secs: env_or(
                "GLOSSA_FALLBACK_TIMEOUT_SECS",
                default_fallback_timeout(),
            ),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            fast_model: default_model(),
            fallback_model: default_model(),
            lemma_timeout_secs: default_lemma_timeout(),
            sense_timeout_secs: default_sense_timeout(),
            fallback_timeout_secs: default_fallback_timeout(),
        }
    }
}
