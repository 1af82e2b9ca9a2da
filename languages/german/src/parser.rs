use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::conllu::ConlluError;

/// Tokenizer + tagger + dependency parser producing CoNLL-U
#[async_trait]
pub trait DependencyParser: Send + Sync {
    /// Parse `sentence`, returning CoNLL-U text
    async fn parse(&self, sentence: &str) -> Result<String, AnalyzerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Parser timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parser API error: {0}")]
    Api(String),

    #[error("Malformed CoNLL-U: {0}")]
    Conllu(#[from] ConlluError),

    #[error("Analysis worker failed: {0}")]
    Worker(String),
}

/// UDPipe 2 REST service
#[derive(Clone)]
pub struct UdpipeParser {
    client: reqwest::Client,
    url: String,
    model: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct UdpipeResponse {
    result: String,
    #[serde(default)]
    model: Option<String>,
}

impl UdpipeParser {
    pub fn new(url: String, model: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            model,
            timeout,
        }
    }
}

#[async_trait]
impl DependencyParser for UdpipeParser {
    async fn parse(&self, sentence: &str) -> Result<String, AnalyzerError> {
        // Empty values enable the stage with default options
        let params = [
            ("data", sentence),
            ("model", self.model.as_str()),
            ("tokenizer", ""),
            ("tagger", ""),
            ("parser", ""),
        ];

        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalyzerError::Timeout
                } else {
                    AnalyzerError::Network(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Api(format!(
                "HTTP {}: {}",
                status,
                message.trim()
            )));
        }

        let body: UdpipeResponse = response
            .json()
            .await
            .map_err(|e| AnalyzerError::Api(format!("Failed to parse response: {}", e)))?;

        tracing::trace!(model = ?body.model, "UDPipe parse complete");

        Ok(body.result)
    }
}
