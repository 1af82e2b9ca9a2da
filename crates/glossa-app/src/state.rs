use std::sync::Arc;
use std::time::Duration;

use glossa_config::Config;
use glossa_core::{LookupPipeline, PipelineSettings, UsageSink};
use glossa_dictionary::{FreeDictionaryClient, RetryPolicy};
use glossa_lang_german::{GermanAnalyzer, UdpipeParser};
use glossa_llm::{LlmClient, OpenAiClient};

use crate::usage::TracingUsageSink;

/// Everything a lookup needs, built once at startup and shared by all tasks
pub struct AppState {
    pub config: Config,
    pub pipeline: LookupPipeline,
    pub usage: Arc<dyn UsageSink>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        if config.llm.api_key.is_empty() {
            tracing::warn!("No LLM API key configured, every LLM stage will fail");
        }

        let llm = Arc::new(OpenAiClient::new(
            config.llm.api_key.clone(),
            config.llm.base_url.clone(),
        ));
        let provider = llm.metadata();
        tracing::info!(
            provider = %provider.name,
            base_url = %provider.base_url,
            fast_model = %config.llm.fast_model,
            fallback_model = %config.llm.fallback_model,
            "LLM provider configured"
        );

        let dictionary = &config.dictionary;
        let dictionary = Arc::new(FreeDictionaryClient::new(
            dictionary.base_url.clone(),
            Duration::from_secs(dictionary.timeout_secs),
            RetryPolicy::new(
                dictionary.max_attempts,
                Duration::from_millis(dictionary.initial_backoff_ms),
                Duration::from_millis(dictionary.max_backoff_ms),
            ),
        ));

        let mut pipeline =
            LookupPipeline::new(llm, dictionary, PipelineSettings::from_config(&config));

        let analyzer = &config.analyzer;
        if analyzer.enabled {
            let timeout = Duration::from_secs(analyzer.timeout_secs);
            let parser = UdpipeParser::new(analyzer.url.clone(), analyzer.model.clone(), timeout);
            pipeline = pipeline.with_analyzer(Arc::new(GermanAnalyzer::new(
                Arc::new(parser),
                timeout,
            )));
            tracing::info!(url = %analyzer.url, model = %analyzer.model, "German analyzer enabled");
        }

        Self {
            config,
            pipeline,
            usage: Arc::new(TracingUsageSink),
        }
    }
}
