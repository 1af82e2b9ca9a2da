use glossa_types::WordAnalysis;
use unicode_normalization::UnicodeNormalization;

use crate::conllu::ConlluToken;

/// STTS tag of a detached verb particle
const SEPARABLE_PARTICLE_TAG: &str = "PTKVZ";
const SEPARABLE_PARTICLE_RELATION: &str = "compound:prt";
/// STTS tag of a reflexive pronoun
const REFLEXIVE_TAG: &str = "PRF";

/// Find `word` in the parsed sentences and collect what the lemma rules need.
///
/// Matching is exact first, then case-insensitive; both compare NFC-normalised
/// text with surrounding punctuation removed from the clicked word. Returns
/// `None` when no token matches.
pub fn analyze(sentences: &[Vec<ConlluToken>], word: &str) -> Option<WordAnalysis> {
    let target = normalize(word.trim_matches(|c: char| !c.is_alphanumeric()));
    if target.is_empty() {
        return None;
    }

    let found = find_token(sentences, |form| form == target).or_else(|| {
        let lowered = target.to_lowercase();
        find_token(sentences, |form| form.to_lowercase() == lowered)
    });

    let (sentence, token) = found?;
    Some(describe(sentence, token))
}

fn normalize(text: &str) -> String {
    text.nfc().collect()
}

fn find_token<'a>(
    sentences: &'a [Vec<ConlluToken>],
    matches: impl Fn(&str) -> bool,
) -> Option<(&'a [ConlluToken], &'a ConlluToken)> {
    sentences.iter().find_map(|sentence| {
        sentence
            .iter()
            .find(|token| matches(&normalize(&token.form)))
            .map(|token| (sentence.as_slice(), token))
    })
}

fn is_verb(token: &ConlluToken) -> bool {
    token.upos == "VERB" || token.upos == "AUX"
}

fn describe(sentence: &[ConlluToken], token: &ConlluToken) -> WordAnalysis {
    let mut parts = vec![token];
    let mut prefix = None;
    let mut reflexive = None;

    if is_verb(token) {
        for dependent in sentence.iter().filter(|t| t.head == token.id) {
            if prefix.is_none()
                && (dependent.deprel == SEPARABLE_PARTICLE_RELATION
                    || dependent.xpos == SEPARABLE_PARTICLE_TAG)
            {
                prefix = Some(dependent.form.to_lowercase());
                parts.push(dependent);
            } else if reflexive.is_none() && dependent.xpos == REFLEXIVE_TAG {
                reflexive = Some(dependent.form.to_lowercase());
                parts.push(dependent);
            }
        }
    }

    // Sentence order, not dependency order
    parts.sort_by_key(|t| t.id);

    WordAnalysis {
        text: token.form.clone(),
        lemma: token.lemma.clone(),
        pos: token.upos.clone(),
        xpos: token.xpos.clone(),
        gender: token
            .feats
            .get("Gender")
            .and_then(|g| article_for_gender(g))
            .map(str::to_string),
        prefix,
        reflexive,
        parts: parts.into_iter().map(|t| t.form.clone()).collect(),
    }
}

fn article_for_gender(gender: &str) -> Option<&'static str> {
    match gender {
        "Masc" => Some("der"),
        "Fem" => Some("die"),
        "Neut" => Some("das"),
        _ => None,
    }
}
