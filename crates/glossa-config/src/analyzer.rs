use serde::{Deserialize, Serialize};

use crate::{env_or, env_string};

fn default_enabled() -> bool {
    true
}

fn default_url() -> String {
    "https://lindat.mff.cuni.cz/services/udpipe/api/process".to_string()
}

fn default_model() -> String {
    "german".to_string()
}

fn default_timeout() -> u64 {
    5
}

/// Dependency parser used by the German analyzer
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AnalyzerConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_url")]
    pub url: String,
    /// UDPipe model name
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self {
            enabled: env_or("GLOSSA_ANALYZER_ENABLED", default_enabled()),
            url: env_string("GLOSSA_ANALYZER_URL", default_url()),
            model: env_string("GLOSSA_ANALYZER_MODEL", default_model()),
            timeout_secs: env_or("GLOSSA_ANALYZER_TIMEOUT_SECS", default_timeout()),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: default_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
        }
    }
}
