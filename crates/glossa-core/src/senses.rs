use std::sync::Arc;
use std::time::Duration;

use glossa_dictionary::{build_sense_listing, get_sense, parse_sense_label};
use glossa_llm::{LlmClient, LlmRequest};
use glossa_types::{CallStats, DictionaryEntry, SenseIndex, SenseResult};
use tracing::debug;

use crate::error::log_llm_failure;
use crate::prompts;

/// Room for a label such as "12.3.4" and nothing else
const SENSE_MAX_TOKENS: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SenseSelection {
    pub sense: SenseResult,
    pub index: SenseIndex,
    /// `None` when no LLM call returned
    pub stats: Option<CallStats>,
}

impl SenseSelection {
    /// `entry.sense` or `entry.sense.subsense`
    pub fn label(&self) -> String {
        self.index.to_string()
    }

    fn first_sense(entries: &[DictionaryEntry]) -> Self {
        let index = SenseIndex::default();
        Self {
            sense: get_sense(entries, &index),
            index,
            stats: None,
        }
    }
}

/// Picks the sense of a word that fits its sentence
pub struct SenseSelector {
    llm: Arc<dyn LlmClient>,
    model: String,
    timeout: Duration,
}

impl SenseSelector {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            llm,
            model: model.into(),
            timeout,
        }
    }

    /// Choose among all senses and subsenses of `entries`.
    ///
    /// Empty or trivial entry sets never reach the LLM. A failed call falls
    /// back to `0.0`; a reply without a usable label is clamped.
    pub async fn select(
        &self,
        sentence: &str,
        word: &str,
        entries: &[DictionaryEntry],
    ) -> SenseSelection {
        let Some(listing) = build_sense_listing(entries) else {
            debug!(entries = entries.len(), "Nothing to choose from, taking 0.0");
            return SenseSelection::first_sense(entries);
        };

        let request = LlmRequest::new(
            self.model.as_str(),
            prompts::sense_messages(word, sentence, &listing),
            self.timeout,
        )
        .max_tokens(SENSE_MAX_TOKENS)
        .temperature(0.0);

        match self.llm.call(request).await {
            Ok(response) => {
                let index = parse_sense_label(&response.content, entries);
                debug!(reply = %response.content.trim(), label = %index, "Sense selected");
                SenseSelection {
                    sense: get_sense(entries, &index),
                    index,
                    stats: Some(response.stats),
                }
            }
            Err(e) => {
                log_llm_failure("sense_selection", &e);
                SenseSelection::first_sense(entries)
            }
        }
    }
}
