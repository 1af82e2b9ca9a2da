use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Incoming lookup: a clicked word in the sentence it was clicked in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    pub word: String,
    pub sentence: String,
    /// Language display name ("German") or ISO 639-1 code ("de")
    pub language: String,
}

/// CEFR proficiency level, A1 lowest to C2 highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub const ALL: [CefrLevel; 6] = [
        CefrLevel::A1,
        CefrLevel::A2,
        CefrLevel::B1,
        CefrLevel::B2,
        CefrLevel::C1,
        CefrLevel::C2,
    ];

    /// Parse a level out of free-form model output ("b1", "Level: C2", "A2 (elementary)").
    ///
    /// The first letter/digit pair forming a valid level wins.
    pub fn parse(s: &str) -> Option<Self> {
        let upper: Vec<char> = s.to_uppercase().chars().collect();

        upper.windows(2).find_map(|pair| match (pair[0], pair[1]) {
            ('A', '1') => Some(CefrLevel::A1),
            ('A', '2') => Some(CefrLevel::A2),
            ('B', '1') => Some(CefrLevel::B1),
            ('B', '2') => Some(CefrLevel::B2),
            ('C', '1') => Some(CefrLevel::C1),
            ('C', '2') => Some(CefrLevel::C2),
            _ => None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the lemma stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LemmaResult {
    pub lemma: String,
    /// Tokens of the sentence belonging to this lemma, in sentence order
    pub related_words: Option<Vec<String>>,
    pub level: Option<CefrLevel>,
}

/// Token and cost accounting for one LLM call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallStats {
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub cost_usd: f64,
    pub latency_ms: u64,
}

/// One part-of-speech grouping for a headword in the external dictionary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub senses: Vec<Sense>,
    #[serde(default)]
    pub pronunciations: Vec<Pronunciation>,
    #[serde(default)]
    pub forms: Vec<Form>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Nested one level deep; deeper nesting is ignored by the listing
    #[serde(default)]
    pub subsenses: Vec<Sense>,
}

impl Sense {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            ..Default::default()
        }
    }
}

/// Usage example, either a bare string or an object carrying `text`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Example {
    Text(String),
    Quote { text: String },
}

impl Example {
    pub fn text(&self) -> &str {
        match self {
            Example::Text(text) => text,
            Example::Quote { text } => text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pronunciation {
    /// Transcription system, "ipa" for IPA
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Form {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Position of a sense inside a list of entries.
///
/// Rendered as `entry.sense` or `entry.sense.subsense`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SenseIndex {
    pub entry: usize,
    pub sense: usize,
    pub subsense: Option<usize>,
}

impl SenseIndex {
    pub fn new(entry: usize, sense: usize, subsense: Option<usize>) -> Self {
        Self {
            entry,
            sense,
            subsense,
        }
    }
}

impl fmt::Display for SenseIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subsense {
            Some(sub) => write!(f, "{}.{}.{}", self.entry, self.sense, sub),
            None => write!(f, "{}.{}", self.entry, self.sense),
        }
    }
}

/// Definition and examples of the sense chosen for a word
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SenseResult {
    pub definition: Option<String>,
    pub examples: Vec<String>,
}

/// Grammatical metadata derived from one dictionary entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammaticalInfo {
    pub pos: Option<String>,
    /// Article form ("der", "la", ...)
    pub gender: Option<String>,
    /// IPA transcription
    pub phonetics: Option<String>,
    /// Form name ("present", "plural", ...) to form
    pub conjugations: Option<BTreeMap<String, String>>,
}

/// Result of linguistic analysis of one token. Primitives only, no parser types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordAnalysis {
    /// Surface text as found in the sentence
    pub text: String,
    pub lemma: String,
    /// Universal POS tag (VERB, NOUN, ADJ, ...)
    pub pos: String,
    /// Language-specific tag (STTS for German)
    pub xpos: String,
    pub gender: Option<String>,
    /// Detached separable prefix ("vor" in "stellte ... vor")
    pub prefix: Option<String>,
    /// Reflexive pronoun attached to the verb
    pub reflexive: Option<String>,
    /// The token plus its prefix/reflexive dependents, in sentence order
    pub parts: Vec<String>,
}

/// Which path produced a [`LookupResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupSource {
    Hybrid,
    Llm,
}

impl LookupSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupSource::Hybrid => "hybrid",
            LookupSource::Llm => "llm",
        }
    }
}

/// Final answer handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub lemma: String,
    pub definition: String,
    pub related_words: Option<Vec<String>>,
    pub level: Option<CefrLevel>,
    pub pos: Option<String>,
    pub gender: Option<String>,
    pub phonetics: Option<String>,
    pub conjugations: Option<BTreeMap<String, String>>,
    pub examples: Vec<String>,
    pub source: LookupSource,
}
