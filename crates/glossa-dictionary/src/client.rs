use std::time::Duration;

use async_trait::async_trait;
use glossa_types::{DictionaryEntry, LanguageRules};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::reflexive::strip_reflexive;
use crate::retry::{RetryPolicy, retry_transient};
use crate::{DictionaryError, DictionaryProvider};

/// Client for the Free Dictionary API (Wiktionary-derived entries)
#[derive(Clone)]
pub struct FreeDictionaryClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    #[serde(default)]
    entries: Vec<DictionaryEntry>,
}

impl FreeDictionaryClient {
    pub fn new(base_url: String, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            timeout,
            retry,
        }
    }

    /// `{base}/entries/{code}/{word}` with the word percent-encoded
    fn entries_url(&self, language_code: &str, word: &str) -> Result<Url, DictionaryError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DictionaryError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| DictionaryError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["entries", language_code, word]);

        Ok(url)
    }

    async fn request_entries(&self, url: Url) -> Result<Option<Vec<DictionaryEntry>>, DictionaryError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(DictionaryError::Api(format!("HTTP {}", response.status())));
        }

        let body: EntriesResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                DictionaryError::Timeout
            } else {
                DictionaryError::InvalidResponse(format!("Failed to parse entries: {}", e))
            }
        })?;

        Ok(Some(body.entries).filter(|entries| !entries.is_empty()))
    }
}

fn classify(err: reqwest::Error) -> DictionaryError {
    if err.is_timeout() {
        DictionaryError::Timeout
    } else if err.is_connect() {
        DictionaryError::Connection(err.to_string())
    } else {
        DictionaryError::Network(err)
    }
}

#[async_trait]
impl DictionaryProvider for FreeDictionaryClient {
    async fn fetch(
        &self,
        word: &str,
        language: &LanguageRules,
    ) -> Result<Option<Vec<DictionaryEntry>>, DictionaryError> {
        let query = strip_reflexive(word, language);
        if query.is_empty() {
            return Ok(None);
        }

        let url = self.entries_url(language.code, &query)?;
        tracing::debug!(word = %query, language = language.code, "Querying dictionary");

        let entries = retry_transient("dictionary fetch", &self.retry, || {
            self.request_entries(url.clone())
        })
        .await?;

        match &entries {
            Some(found) => tracing::debug!(word = %query, entries = found.len(), "Dictionary hit"),
            None => tracing::debug!(word = %query, "Dictionary miss"),
        }

        Ok(entries)
    }

    fn name(&self) -> &str {
        "freedictionaryapi"
    }
}
