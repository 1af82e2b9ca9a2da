use glossa_types::LanguageRules;

/// Reduce a reflexive citation form to the bare infinitive the dictionary indexes.
///
/// "sich vorstellen" → "vorstellen", "levantarse" → "levantar",
/// "s'asseoir" → "asseoir". A word that is only a reflexive pronoun becomes empty.
pub fn strip_reflexive(word: &str, rules: &LanguageRules) -> String {
    let word = word.trim();
    let lower = word.to_lowercase();

    for prefix in rules.reflexive_prefixes {
        if lower == prefix.trim() {
            return String::new();
        }
        if lower.starts_with(prefix) {
            if let Some(rest) = word.get(prefix.len()..) {
                return rest.trim().to_string();
            }
        }
    }

    for (suffix, replacement) in rules.reflexive_suffixes {
        let stem_len = lower.chars().count().saturating_sub(suffix.chars().count());
        if lower.ends_with(suffix) && stem_len >= 1 {
            let stem_end = word.len().checked_sub(suffix.len());
            if let Some(stem) = stem_end.and_then(|end| word.get(..end)) {
                return format!("{}{}", stem, replacement);
            }
        }
    }

    word.to_string()
}
