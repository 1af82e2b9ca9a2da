use async_trait::async_trait;
use glossa_core::{UsageRecord, UsageSink};

/// Writes every usage record to the log
pub struct TracingUsageSink;

#[async_trait]
impl UsageSink for TracingUsageSink {
    async fn record(&self, user_id: Option<&str>, record: &UsageRecord) {
        let stats = &record.stats;
        tracing::info!(
            user_id = user_id.unwrap_or("anonymous"),
            operation = record.operation.as_str(),
            model = %stats.model,
            prompt_tokens = stats.prompt_tokens,
            completion_tokens = stats.completion_tokens,
            cost_usd = stats.cost_usd,
            latency_ms = stats.latency_ms,
            "LLM usage"
        );
    }
}
