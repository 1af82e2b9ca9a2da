use std::fmt::Write as _;
use std::sync::LazyLock;

use glossa_types::{DictionaryEntry, Sense, SenseIndex, SenseResult};
use regex::Regex;

/// Examples returned per selected sense
pub const MAX_EXAMPLES: usize = 3;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\.([0-9]+)(?:\.([0-9]+))?").expect("sense label pattern is valid")
});

/// One entry with at most one sense and no subsenses: nothing to choose from
pub fn is_trivial(entries: &[DictionaryEntry]) -> bool {
    match entries {
        [entry] => match entry.senses.as_slice() {
            [] => true,
            [sense] => sense.subsenses.is_empty(),
            _ => false,
        },
        _ => false,
    }
}

/// Numbered listing of every sense and subsense.
///
/// One line per sense, `{entry}.{sense} {definition}` or
/// `{entry}.{sense}.{subsense} {definition}`. Returns `None` when there is
/// nothing to choose between (no entries, or a trivial entry set).
pub fn build_sense_listing(entries: &[DictionaryEntry]) -> Option<String> {
    if entries.is_empty() || is_trivial(entries) {
        return None;
    }

    let mut listing = String::new();
    for (e, entry) in entries.iter().enumerate() {
        for (s, sense) in entry.senses.iter().enumerate() {
            let _ = writeln!(listing, "{}.{} {}", e, s, one_line(&sense.definition));
            for (ss, subsense) in sense.subsenses.iter().enumerate() {
                let _ = writeln!(
                    listing,
                    "{}.{}.{} {}",
                    e,
                    s,
                    ss,
                    one_line(&subsense.definition)
                );
            }
        }
    }

    Some(listing.trim_end().to_string())
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a model-chosen label against `entries`, clamping every index.
///
/// The first ASCII-digit `N.N` or `N.N.N` match in `label` is used; a reply without one
/// resolves to `0.0`. Out-of-range numbers clamp to the last valid index and
/// a subsense is dropped when the sense has none.
pub fn parse_sense_label(label: &str, entries: &[DictionaryEntry]) -> SenseIndex {
    let Some(caps) = LABEL_RE.captures(label) else {
        return SenseIndex::default();
    };

    // Overflowing numbers saturate and are clamped below
    let number = |i: usize| {
        caps.get(i)
            .map(|m| m.as_str().parse::<usize>().unwrap_or(usize::MAX))
    };

    clamp_index(
        entries,
        number(1).unwrap_or(0),
        number(2).unwrap_or(0),
        number(3),
    )
}

fn clamp_index(
    entries: &[DictionaryEntry],
    entry: usize,
    sense: usize,
    subsense: Option<usize>,
) -> SenseIndex {
    if entries.is_empty() {
        return SenseIndex::default();
    }

    let entry = entry.min(entries.len() - 1);
    let senses = &entries[entry].senses;
    if senses.is_empty() {
        return SenseIndex::new(entry, 0, None);
    }

    let sense = sense.min(senses.len() - 1);
    let subsenses = &senses[sense].subsenses;
    let subsense = match subsense {
        Some(sub) if !subsenses.is_empty() => Some(sub.min(subsenses.len() - 1)),
        _ => None,
    };

    SenseIndex::new(entry, sense, subsense)
}

/// Definition and up to [`MAX_EXAMPLES`] examples at `index`.
///
/// A selected subsense supplies the definition; when it has no examples the
/// parent sense's examples are used. Unresolvable indices give an empty result.
pub fn get_sense(entries: &[DictionaryEntry], index: &SenseIndex) -> SenseResult {
    let Some(sense) = entries
        .get(index.entry)
        .and_then(|entry| entry.senses.get(index.sense))
    else {
        return SenseResult::default();
    };

    let subsense = index.subsense.and_then(|sub| sense.subsenses.get(sub));

    let definition = subsense
        .map(|sub| sub.definition.trim())
        .filter(|d| !d.is_empty())
        .or_else(|| Some(sense.definition.trim()).filter(|d| !d.is_empty()))
        .map(str::to_string);

    let examples = match subsense {
        Some(sub) if !sub.examples.is_empty() => collect_examples(sub),
        _ => collect_examples(sense),
    };

    SenseResult {
        definition,
        examples,
    }
}

fn collect_examples(sense: &Sense) -> Vec<String> {
    sense
        .examples
        .iter()
        .map(|example| example.text().trim())
        .filter(|text| !text.is_empty())
        .take(MAX_EXAMPLES)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use glossa_types::Example;

    use super::*;

    fn entry(senses: Vec<Sense>) -> DictionaryEntry {
        DictionaryEntry {
            part_of_speech: "noun".to_string(),
            senses,
            ..Default::default()
        }
    }

    fn with_subsenses(definition: &str, subs: &[&str]) -> Sense {
        Sense {
            subsenses: subs.iter().map(|d| Sense::new(*d)).collect(),
            ..Sense::new(definition)
        }
    }

    fn sample() -> Vec<DictionaryEntry> {
        vec![
            entry(vec![
                Sense::new("a bank of a river"),
                with_subsenses("a financial institution", &["a branch office", "the building"]),
            ]),
            entry(vec![Sense::new("to rely on")]),
        ]
    }

    #[test]
    fn test_triviality() {
        assert!(is_trivial(&[entry(vec![Sense::new("only")])]));
        assert!(is_trivial(&[entry(vec![])]));
        assert!(!is_trivial(&[entry(vec![with_subsenses("x", &["y"])])]));
        assert!(!is_trivial(&[entry(vec![Sense::new("a"), Sense::new("b")])]));
        assert!(!is_trivial(&[]));
        assert!(!is_trivial(&sample()));
    }

    #[test]
    fn test_listing_format() {
        let listing = build_sense_listing(&sample()).unwrap();
        let expected = "0.0 a bank of a river\n\
                        0.1 a financial institution\n\
                        0.1.0 a branch office\n\
                        0.1.1 the building\n\
                        1.0 to rely on";
        assert_eq!(listing, expected);
    }

    #[test]
    fn test_listing_none_when_trivial_or_empty() {
        assert_eq!(build_sense_listing(&[]), None);
        assert_eq!(build_sense_listing(&[entry(vec![Sense::new("only")])]), None);
    }

    #[test]
    fn test_label_parsing_and_clamping() {
        let entries = sample();
        assert_eq!(parse_sense_label("0.1", &entries), SenseIndex::new(0, 1, None));
        assert_eq!(parse_sense_label("The answer is 0.1.1.", &entries), SenseIndex::new(0, 1, Some(1)));
        assert_eq!(parse_sense_label("9.9", &entries), SenseIndex::new(1, 0, None));
        assert_eq!(parse_sense_label("0.1.7", &entries), SenseIndex::new(0, 1, Some(1)));
        assert_eq!(parse_sense_label("0.0.3", &entries), SenseIndex::new(0, 0, None));
        assert_eq!(parse_sense_label("banana", &entries), SenseIndex::new(0, 0, None));
        assert_eq!(
            parse_sense_label("99999999999999999999999.1", &entries),
            SenseIndex::new(1, 0, None)
        );
        assert_eq!(parse_sense_label("3.4", &[]), SenseIndex::default());
    }

    #[test]
    fn test_non_ascii_digits_are_not_a_label() {
        let entries = sample();
        assert_eq!(parse_sense_label("٣.٣", &entries), SenseIndex::new(0, 0, None));
        assert_eq!(parse_sense_label("１.１", &entries), SenseIndex::new(0, 0, None));
    }

    #[test]
    fn test_clamped_index_always_resolves() {
        let entries = sample();
        for label in ["", "1", "0.", "-1.-1", "7.7.7", "1.0.0", "٣.٣"] {
            let index = parse_sense_label(label, &entries);
            assert!(index.entry < entries.len(), "{label}");
            assert!(index.sense < entries[index.entry].senses.len(), "{label}");
            assert!(get_sense(&entries, &index).definition.is_some(), "{label}");
        }
    }

    #[test]
    fn test_get_sense_subsense_and_examples() {
        let mut entries = sample();
        entries[0].senses[1].examples = vec![
            Example::Text("I went to the bank.".to_string()),
            Example::Quote {
                text: "The bank was closed.".to_string(),
            },
            Example::Text("  ".to_string()),
            Example::Text("Banks lend money.".to_string()),
            Example::Text("A fourth one.".to_string()),
        ];

        let result = get_sense(&entries, &SenseIndex::new(0, 1, Some(0)));
        assert_eq!(result.definition.as_deref(), Some("a branch office"));
        assert_eq!(
            result.examples,
            vec!["I went to the bank.", "The bank was closed.", "Banks lend money."]
        );

        let missing = get_sense(&entries, &SenseIndex::new(5, 0, None));
        assert_eq!(missing, SenseResult::default());
    }
}
