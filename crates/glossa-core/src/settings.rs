use std::time::Duration;

use glossa_config::Config;

/// Models and time budgets for one pipeline instance
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Lemma, level and sense-selection calls
    pub fast_model: String,
    pub fallback_model: String,
    pub lemma_timeout: Duration,
    pub sense_timeout: Duration,
    pub fallback_timeout: Duration,
    /// Outer bound on the whole dictionary stage, retries included
    pub dictionary_timeout: Duration,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        let llm = &config.llm;
        let dictionary = &config.dictionary;

        let attempts = u64::from(dictionary.max_attempts.max(1));
        let per_attempt = dictionary.timeout_secs.saturating_mul(1000);
        let backoff = dictionary.max_backoff_ms.saturating_mul(attempts - 1);
        // One second of slack over the worst case the retry loop can take
        let dictionary_ms = per_attempt
            .saturating_mul(attempts)
            .saturating_add(backoff)
            .saturating_add(1000);

        Self {
            fast_model: llm.fast_model.clone(),
            fallback_model: llm.fallback_model.clone(),
            lemma_timeout: Duration::from_secs(llm.lemma_timeout_secs),
            sense_timeout: Duration::from_secs(llm.sense_timeout_secs),
            fallback_timeout: Duration::from_secs(llm.fallback_timeout_secs),
            dictionary_timeout: Duration::from_millis(dictionary_ms),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_budget_covers_retries() {
        let settings = PipelineSettings::default();
        // 3 x 5s attempts, 2 x 4s backoff, 1s slack
        assert_eq!(settings.dictionary_timeout, Duration::from_secs(24));
        assert_eq!(settings.sense_timeout, Duration::from_secs(15));
        assert_eq!(settings.fast_model, "gpt-4o-mini");
    }
}
