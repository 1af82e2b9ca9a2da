//! Prompt text for every LLM-backed stage.

use glossa_llm::Message;
use glossa_types::LanguageRules;

const LEMMA_SYSTEM: &str = "You are a lexicographer. You identify the dictionary form of a word \
as it is used in a sentence and answer with a single JSON object and nothing else.";

const LEMMA_FORMAT: &str = r#"Answer with JSON only:
{"lemma": "<dictionary form>", "related_words": ["<token>", ...], "level": "<A1|A2|B1|B2|C1|C2>"}
"related_words" lists the tokens of the sentence that belong to this lemma, copied exactly and in sentence order."#;

const ENGLISH_GUIDANCE: &str = "Phrasal verbs count as one lemma when the particle changes the \
meaning (\"gave up\" -> \"give up\"). Plural nouns become singular, inflected verbs become the bare \
infinitive without \"to\", comparatives become the positive form.";

const GERMAN_GUIDANCE: &str = "German verbs: a separable prefix detached to the end of the clause \
belongs to the verb (\"stellte ... vor\" -> \"vorstellen\"). A reflexive pronoun that is part of the \
verb is written first (\"freute sich\" -> \"sich freuen\"; \"stelle mich vor\" -> \"sich vorstellen\"). \
Nouns keep their capitalisation; articles and participles used as adjectives stay lowercase.";

const GENERIC_GUIDANCE: &str = "Use the citation form a learner's dictionary would list: \
infinitive for verbs, singular for nouns, masculine singular for adjectives where the language has gender.";

/// Reduced lemma prompt, tailored for English and German
pub fn lemma_messages(word: &str, sentence: &str, language: &str) -> Vec<Message> {
    let guidance = match glossa_types::rules_for(language).map(|rules| rules.code) {
        Some("en") => ENGLISH_GUIDANCE,
        Some("de") => GERMAN_GUIDANCE,
        _ => GENERIC_GUIDANCE,
    };

    vec![
        Message::system(LEMMA_SYSTEM),
        Message::user(format!(
            "Language: {language}\nSentence: {sentence}\nWord: {word}\n\n{guidance}\n\n{LEMMA_FORMAT}"
        )),
    ]
}

/// One-token CEFR estimate for an already known lemma
pub fn level_messages(word: &str, sentence: &str, lemma: &str, language: &str) -> Vec<Message> {
    vec![
        Message::system(
            "You rate vocabulary difficulty on the CEFR scale. Reply with exactly one of A1, A2, B1, B2, C1, C2.",
        ),
        Message::user(format!(
            "Language: {language}\nSentence: {sentence}\nWord: {word}\nLemma: {lemma}\nLevel:"
        )),
    ]
}

/// Pick one line of a numbered sense listing
pub fn sense_messages(word: &str, sentence: &str, listing: &str) -> Vec<Message> {
    vec![
        Message::system(
            "You choose which dictionary sense fits a word in context. Reply with the number label only, e.g. 0.1 or 1.0.2.",
        ),
        Message::user(format!(
            "Sentence: {sentence}\nWord: {word}\n\nSenses:\n{listing}\n\nLabel:"
        )),
    ]
}

/// Single-call lookup asking for every field at once
pub fn fallback_messages(
    word: &str,
    sentence: &str,
    language: &str,
    rules: Option<&LanguageRules>,
) -> Vec<Message> {
    let gender_line = match rules {
        Some(rules) if rules.has_gender() => {
            let mut articles: Vec<&str> = Vec::new();
            for (_, article) in rules.gender_keywords {
                if !articles.contains(article) {
                    articles.push(*article);
                }
            }
            format!(
                "\"gender\": the article of a noun, one of {}, otherwise null,\n",
                articles.join("/")
            )
        }
        _ => String::new(),
    };

    let mut prompt = format!(
        "Language: {language}\nSentence: {sentence}\nWord: {word}\n\n\
Explain the word as used in this sentence. Answer with one JSON object containing:\n\
\"lemma\": the dictionary form,\n\
\"definition\": a short English definition of this sense,\n\
\"related_words\": tokens of the sentence that belong to the lemma, in sentence order,\n\
\"pos\": the part of speech,\n\
{gender_line}\
\"conjugations\": an object of key forms (for verbs present, past, participle, auxiliary; for nouns genitive, plural) or null,\n\
\"level\": the CEFR level, one of A1, A2, B1, B2, C1, C2."
    );

    if rules.is_some_and(|r| r.code == "de") {
        prompt.push_str("\n\n");
        prompt.push_str(GERMAN_GUIDANCE);
        prompt.push_str(
            " For verbs with a fixed preposition (\"warten auf\") give the preposition in the definition.",
        );
    }

    vec![
        Message::system("You are a bilingual dictionary. Answer with JSON only."),
        Message::user(prompt),
    ]
}
