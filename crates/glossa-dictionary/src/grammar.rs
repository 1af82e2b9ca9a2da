//! Grammatical metadata from an already-selected dictionary entry. No I/O.

use std::collections::BTreeMap;

use glossa_types::{DictionaryEntry, Form, GrammaticalInfo, LanguageRules};

use crate::senses::parse_sense_label;

/// Form tags marking table headers and template debris rather than real forms
const SKIPPED_FORM_TAGS: &[&str] = &[
    "table-tags",
    "inflection-template",
    "class",
    "multiword-construction",
    "romanization",
];

const PERSON_TAGS: &[&str] = &["first-person", "second-person"];

const OBLIQUE_CASES: &[&str] = &["genitive", "dative", "accusative"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordClass {
    Verb,
    Noun,
    Adjective,
    Other,
}

impl WordClass {
    fn of(part_of_speech: &str) -> Self {
        let pos = part_of_speech.to_lowercase();
        if pos.contains("verb") && !pos.contains("adverb") {
            WordClass::Verb
        } else if pos.contains("noun") {
            WordClass::Noun
        } else if pos.starts_with("adj") {
            WordClass::Adjective
        } else {
            WordClass::Other
        }
    }
}

/// POS, gender, phonetics and inflected forms of `entry` under `rules`
pub fn extract_grammar(entry: &DictionaryEntry, rules: &LanguageRules) -> GrammaticalInfo {
    let pos = Some(entry.part_of_speech.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    GrammaticalInfo {
        pos,
        gender: detect_gender(entry, rules),
        phonetics: detect_phonetics(entry, rules),
        conjugations: extract_forms(entry),
    }
}

/// [`extract_grammar`] for the entry a sense label points into
pub fn extract_grammar_for_label(
    entries: &[DictionaryEntry],
    label: &str,
    rules: &LanguageRules,
) -> GrammaticalInfo {
    let index = parse_sense_label(label, entries);
    entries
        .get(index.entry)
        .map(|entry| extract_grammar(entry, rules))
        .unwrap_or_default()
}

fn detect_gender(entry: &DictionaryEntry, rules: &LanguageRules) -> Option<String> {
    if !rules.has_gender() {
        return None;
    }

    let from_tags = entry
        .senses
        .first()
        .and_then(|sense| sense.tags.iter().find_map(|tag| rules.article_for(tag)));

    let article = from_tags.or_else(|| {
        let pos = entry.part_of_speech.to_lowercase();
        rules
            .gender_keywords
            .iter()
            .find(|(keyword, _)| pos.contains(keyword))
            .map(|(_, article)| *article)
    });

    article.map(str::to_string)
}

fn detect_phonetics(entry: &DictionaryEntry, rules: &LanguageRules) -> Option<String> {
    if !rules.has_phonetics {
        return None;
    }

    entry
        .pronunciations
        .iter()
        .find(|p| p.kind.eq_ignore_ascii_case("ipa") && !p.text.trim().is_empty())
        .map(|p| p.text.trim().to_string())
}

fn extract_forms(entry: &DictionaryEntry) -> Option<BTreeMap<String, String>> {
    let class = WordClass::of(&entry.part_of_speech);
    if class == WordClass::Other {
        return None;
    }

    let mut forms = BTreeMap::new();
    let mut auxiliaries: Vec<&str> = Vec::new();

    let usable = entry.forms.iter().filter(|form| {
        !form.word.trim().is_empty() && !SKIPPED_FORM_TAGS.iter().any(|tag| form.has_tag(tag))
    });

    for form in usable {
        let word = form.word.trim();

        match class {
            WordClass::Verb => {
                if form.has_tag("auxiliary") {
                    if !auxiliaries.contains(&word) {
                        auxiliaries.push(word);
                    }
                    continue;
                }
                if let Some(name) = verb_form_name(form) {
                    forms.entry(name.to_string()).or_insert_with(|| word.to_string());
                }
            }
            WordClass::Noun => {
                if let Some(name) = noun_form_name(form) {
                    forms.entry(name.to_string()).or_insert_with(|| word.to_string());
                }
            }
            WordClass::Adjective => {
                if let Some(name) = adjective_form_name(form) {
                    forms.entry(name.to_string()).or_insert_with(|| word.to_string());
                }
            }
            WordClass::Other => {}
        }
    }

    if !auxiliaries.is_empty() {
        forms.insert("auxiliary".to_string(), auxiliaries.join(", "));
    }

    (!forms.is_empty()).then_some(forms)
}

fn verb_form_name(form: &Form) -> Option<&'static str> {
    let has = |tag: &str| form.has_tag(tag);

    if has("participle") && has("past") {
        Some("participle")
    } else if has("present") && has("singular") && has("third-person") && !has("subjunctive") {
        Some("present")
    } else if (form.tags.len() == 1 && has("past"))
        || (has("preterite")
            && !has("subjunctive")
            && !has("plural")
            && !PERSON_TAGS.iter().any(|tag| has(tag)))
    {
        Some("past")
    } else {
        None
    }
}

fn noun_form_name(form: &Form) -> Option<&'static str> {
    let has = |tag: &str| form.has_tag(tag);

    if has("genitive") && !has("plural") {
        Some("genitive")
    } else if has("plural") && !OBLIQUE_CASES.iter().any(|tag| has(tag)) {
        Some("plural")
    } else if has("feminine") {
        Some("feminine")
    } else {
        None
    }
}

fn adjective_form_name(form: &Form) -> Option<&'static str> {
    let has = |tag: &str| form.has_tag(tag);

    if has("comparative") {
        Some("comparative")
    } else if has("superlative") {
        Some("superlative")
    } else if has("feminine") && !has("plural") {
        Some("feminine")
    } else {
        None
    }
}
