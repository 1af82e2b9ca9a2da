use unicode_normalization::UnicodeNormalization;

/// Clicked word as the pipeline sees it: NFC, trimmed, no wrapping punctuation.
///
/// Inner apostrophes and hyphens survive ("l'eau", "E-Mail").
pub fn clean_word(word: &str) -> String {
    let word: String = word.nfc().collect();
    word.trim_matches(|c: char| !c.is_alphanumeric()).to_string()
}

/// Sentence in NFC with line breaks and runs of whitespace collapsed
pub fn clean_sentence(sentence: &str) -> String {
    let sentence: String = sentence.nfc().collect();
    sentence.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sort `words` by where they first occur in `sentence`.
///
/// Position is the index of the first case-insensitive token match; words not
/// found keep their relative order after the found ones.
pub fn order_by_sentence(words: Vec<String>, sentence: &str) -> Vec<String> {
    let tokens: Vec<String> = sentence
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’' || c == '-'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect();

    let mut used = vec![false; tokens.len()];
    let mut positioned: Vec<(usize, String)> = words
        .into_iter()
        .map(|word| {
            let lowered = word.to_lowercase();
            let position = tokens
                .iter()
                .enumerate()
                .position(|(i, token)| !used[i] && *token == lowered);
            if let Some(i) = position {
                used[i] = true;
            }
            (position.unwrap_or(usize::MAX), word)
        })
        .collect();

    positioned.sort_by_key(|(position, _)| *position);
    positioned.into_iter().map(|(_, word)| word).collect()
}
