use std::time::Duration;

use glossa_dictionary::get_sense;
use glossa_types::{DictionaryEntry, Sense, SenseIndex, SenseResult};

use super::fakes::{ScriptedLlm, entry, llm_errors};
use crate::senses::SenseSelector;

fn selector(llm: std::sync::Arc<ScriptedLlm>) -> SenseSelector {
    SenseSelector::new(llm, "fast-model", Duration::from_secs(1))
}

fn ambiguous() -> Vec<DictionaryEntry> {
    let mut bank = entry("noun", &["the edge of a river", "a financial institution"]);
    bank.senses[1].subsenses = vec![Sense::new("a branch office"), Sense::new("the building")];
    vec![bank, entry("verb", &["to rely on"])]
}

#[tokio::test]
async fn test_trivial_entries_skip_llm() {
    let llm = ScriptedLlm::replying(&["1.0"]);
    let entries = vec![entry("noun", &["the only meaning"])];

    let selection = selector(llm.clone()).select("A sentence.", "word", &entries).await;

    assert_eq!(llm.calls(), 0);
    assert_eq!(selection.label(), "0.0");
    assert_eq!(selection.sense.definition.as_deref(), Some("the only meaning"));
    assert_eq!(selection.stats, None);
}

#[tokio::test]
async fn test_second_sense_selected() {
    let llm = ScriptedLlm::replying(&["0.1"]);
    let entries = vec![entry("noun", &["Def 1", "Def 2"])];

    let selection = selector(llm.clone()).select("Test sentence", "testword", &entries).await;

    assert_eq!(selection.sense.definition.as_deref(), Some("Def 2"));
    assert_eq!(selection.label(), "0.1");
    assert_eq!(llm.calls(), 1);
    assert!(selection.stats.is_some());

    let request = &llm.requests()[0];
    assert_eq!(request.max_tokens, Some(10));
    assert_eq!(request.temperature, Some(0.0));
    assert!(request.messages[1].content.contains("0.0 Def 1\n0.1 Def 2"));
}

#[tokio::test]
async fn test_empty_entries() {
    let llm = ScriptedLlm::replying(&["0.1"]);

    let selection = selector(llm.clone()).select("Test sentence", "testword", &[]).await;

    assert_eq!(selection.sense, SenseResult::default());
    assert_eq!(selection.label(), "0.0");
    assert_eq!(selection.stats, None);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_any_llm_error_falls_back_to_first_sense() {
    let entries = ambiguous();
    let expected = get_sense(&entries, &SenseIndex::default());

    for error in llm_errors() {
        let kind = error.to_string();
        let llm = ScriptedLlm::new(vec![Err(error)]);

        let selection = selector(llm).select("I sat by the bank.", "bank", &entries).await;

        assert_eq!(selection.sense, expected, "{kind}");
        assert_eq!(selection.label(), "0.0", "{kind}");
        assert_eq!(selection.stats, None, "{kind}");
    }
}

#[tokio::test]
async fn test_subsense_label() {
    let llm = ScriptedLlm::replying(&["0.1.1"]);
    let selection = selector(llm).select("The bank is closed.", "bank", &ambiguous()).await;

    assert_eq!(selection.label(), "0.1.1");
    assert_eq!(selection.sense.definition.as_deref(), Some("the building"));
}

#[tokio::test]
async fn test_out_of_range_and_malformed_replies_are_clamped() {
    let entries = ambiguous();

    for reply in ["7.9.9", "Answer: 0.5", "the second one", ""] {
        let llm = ScriptedLlm::replying(&[reply]);
        let selection = selector(llm).select("x", "bank", &entries).await;

        assert!(selection.index.entry < entries.len(), "{reply}");
        let senses = &entries[selection.index.entry].senses;
        assert!(selection.index.sense < senses.len(), "{reply}");
        assert!(selection.sense.definition.is_some(), "{reply}");
        // The call returned, so its tokens are still accounted for
        assert!(selection.stats.is_some(), "{reply}");
    }
}
