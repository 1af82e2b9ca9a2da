//! Forgiving JSON handling for model output.
//!
//! Models wrap JSON in markdown fences, surround it with prose and routinely
//! drop commas or quotes. [`parse_lenient`] tries a strict parse of the
//! extracted block first and only then runs [`repair_json`] over it.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Locate the JSON payload in a model reply.
///
/// Accepts a ```` ```json ```` fence, a bare ```` ``` ```` fence, or the span from
/// the first `{` to the last `}`. An opening brace without a closing one
/// yields the rest of the text so the repair step can close it.
pub fn extract_json_block(content: &str) -> Option<&str> {
    if let Some(fence) = content.find("```") {
        let after = &content[fence + 3..];
        // Skip the info string ("json", "JSON", ...) up to the end of the line
        let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after[body_start..];
        let body = match body.find("```") {
            Some(end) => &body[..end],
            None => body,
        };
        let body = body.trim();
        if body.starts_with('{') || body.starts_with('[') {
            return Some(body);
        }
    }

    let start = content.find('{')?;
    match content.rfind('}') {
        Some(end) if end > start => Some(&content[start..=end]),
        _ => Some(content[start..].trim_end()),
    }
}

/// Parse a model reply into `T`, repairing the JSON if needed
pub fn parse_lenient<T: DeserializeOwned>(content: &str) -> Option<T> {
    let block = extract_json_block(content)?;

    match serde_json::from_str(block) {
        Ok(value) => Some(value),
        Err(strict_err) => {
            let repaired = repair_json(block);
            match serde_json::from_str(&repaired) {
                Ok(value) => {
                    tracing::debug!(error = %strict_err, "Parsed model output after JSON repair");
                    Some(value)
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Model output unparseable after JSON repair");
                    None
                }
            }
        }
    }
}

/// Rewrite almost-JSON into JSON.
///
/// Handles missing commas between values, single-quoted strings, unquoted
/// keys, multi-word bare values, Python literals, trailing and doubled commas,
/// raw control characters, unescaped quotes and unknown escapes inside strings, unterminated
/// strings and unclosed containers. Stray closers are dropped.
pub fn repair_json(input: &str) -> String {
    let chars: Vec<char> = input.trim().chars().collect();
    let mut out = String::with_capacity(input.len() + 16);
    let mut closers: Vec<char> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                separate_values(&mut out);
                i = read_string(&chars, i, &mut out);
            }
            '{' | '[' => {
                separate_values(&mut out);
                out.push(c);
                closers.push(if c == '{' { '}' } else { ']' });
                i += 1;
            }
            '}' | ']' => {
                if let Some(pos) = closers.iter().rposition(|&closer| closer == c) {
                    while closers.len() > pos {
                        if let Some(closer) = closers.pop() {
                            close_container(&mut out, closer);
                        }
                    }
                }
                i += 1;
            }
            ',' => {
                if !matches!(last_significant(&out), None | Some(',' | '{' | '[' | ':')) {
                    out.push(',');
                }
                i += 1;
            }
            ':' => {
                out.push(':');
                i += 1;
            }
            c if c.is_whitespace() => {
                out.push(c);
                i += 1;
            }
            c if c == '-' || c.is_ascii_digit() => {
                let end = scan_while(&chars, i, |ch| {
                    ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '+' | '-')
                });
                separate_values(&mut out);
                out.extend(&chars[i..end]);
                i = end;
            }
            c if c.is_alphabetic() || c == '_' => {
                let end = scan_while(&chars, i, |ch| ch.is_alphanumeric() || ch == '_');
                let word: String = chars[i..end].iter().collect();
                separate_values(&mut out);

                if next_significant(&chars, end) == Some(':') {
                    push_quoted(&mut out, &word);
                    i = end;
                    continue;
                }

                let value_end = scan_bare_value(&chars, end);
                if value_end == end {
                    match word.as_str() {
                        "true" | "True" => out.push_str("true"),
                        "false" | "False" => out.push_str("false"),
                        "null" | "None" => out.push_str("null"),
                        _ => push_quoted(&mut out, &word),
                    }
                } else {
                    let value: String = chars[i..value_end].iter().collect();
                    push_quoted(&mut out, value.trim_end());
                }
                // A quote glued to the value closes it (`test",`)
                i = if chars.get(value_end) == Some(&'"') {
                    value_end + 1
                } else {
                    value_end
                };
            }
            // Backticks, stray punctuation
            _ => i += 1,
        }
    }

    while let Some(closer) = closers.pop() {
        close_container(&mut out, closer);
    }
    strip_trailing_comma(&mut out);

    out
}

/// Read a quoted string starting at `start`, writing a valid JSON string.
///
/// A quote only terminates the string when followed by a structural
/// character or the end of input; other quotes are escaped as content.
fn read_string(chars: &[char], start: usize, out: &mut String) -> usize {
    let quote = chars[start];
    let mut j = start + 1;
    out.push('"');

    while j < chars.len() {
        let c = chars[j];
        match c {
            '\\' => match chars.get(j + 1) {
                Some('\'') => {
                    out.push('\'');
                    j += 2;
                }
                Some(&next) if is_valid_escape(chars, j + 1) => {
                    out.push('\\');
                    out.push(next);
                    j += 2;
                }
                // Unknown escape or a trailing backslash is literal text
                _ => {
                    out.push_str("\\\\");
                    j += 1;
                }
            },
            c if c == quote
                && matches!(
                    next_significant(chars, j + 1),
                    None | Some(',' | '}' | ']' | ':' | '"')
                ) =>
            {
                out.push('"');
                return j + 1;
            }
            '"' => {
                out.push_str("\\\"");
                j += 1;
            }
            '\n' => {
                out.push_str("\\n");
                j += 1;
            }
            '\r' => {
                out.push_str("\\r");
                j += 1;
            }
            '\t' => {
                out.push_str("\\t");
                j += 1;
            }
            c => {
                out.push(c);
                j += 1;
            }
        }
    }

    // Unterminated
    out.push('"');
    j
}

/// End of a run of bare words (`run away`) starting with the word ending at `from`.
///
/// Stops at structural characters, quotes, line breaks and before a word
/// that is itself followed by `:`, so a missing comma still splits members.
fn scan_bare_value(chars: &[char], from: usize) -> usize {
    let mut end = from;
    loop {
        let next = scan_while(chars, end, |ch| ch == ' ');
        match chars.get(next) {
            Some(&ch) if is_bare_char(ch) => {
                let word_end = scan_while(chars, next, is_bare_char);
                if next_significant(chars, word_end) == Some(':') {
                    return end;
                }
                end = word_end;
            }
            _ => return end,
        }
    }
}

fn is_bare_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '\'' | '.' | '/' | '(' | ')' | '!' | '?')
}

/// Whether the character at `at` starts a JSON escape sequence
fn is_valid_escape(chars: &[char], at: usize) -> bool {
    match chars.get(at) {
        Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => true,
        Some('u') => {
            chars.len() > at + 4 && chars[at + 1..=at + 4].iter().all(|c| c.is_ascii_hexdigit())
        }
        _ => false,
    }
}

fn push_quoted(out: &mut String, word: &str) {
    out.push('"');
    out.push_str(word);
    out.push('"');
}

/// Insert a comma when a new value directly follows a finished one
fn separate_values(out: &mut String) {
    if let Some(last) = last_significant(out) {
        if last == '"' || last == '}' || last == ']' || last.is_alphanumeric() {
            out.push(',');
        }
    }
}

fn close_container(out: &mut String, closer: char) {
    strip_trailing_comma(out);
    if last_significant(out) == Some(':') {
        out.push_str("null");
    }
    out.push(closer);
}

fn strip_trailing_comma(out: &mut String) {
    let trimmed = out.trim_end().len();
    if out[..trimmed].ends_with(',') {
        out.truncate(trimmed - 1);
    }
}

fn last_significant(out: &str) -> Option<char> {
    out.trim_end().chars().last()
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars[from.min(chars.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_whitespace())
}

fn scan_while(chars: &[char], from: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut end = from;
    while end < chars.len() && pred(chars[end]) {
        end += 1;
    }
    end
}

/// Non-empty trimmed string for `key`; numbers are stringified
pub fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// String list for `key`; a single string is split on commas
pub fn string_list_field(value: &Value, key: &str) -> Option<Vec<String>> {
    let list: Vec<String> = match value.get(key)? {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => return None,
    };

    (!list.is_empty()).then_some(list)
}

/// Map of scalar values for `key`; nested values and empty strings are dropped
pub fn string_map_field(value: &Value, key: &str) -> Option<BTreeMap<String, String>> {
    let object = value.get(key)?.as_object()?;
    let map: BTreeMap<String, String> = object
        .iter()
        .filter_map(|(name, v)| {
            let text = match v {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            (!text.is_empty()).then(|| (name.clone(), text))
        })
        .collect();

    (!map.is_empty()).then_some(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repaired(input: &str) -> Value {
        let fixed = repair_json(input);
        serde_json::from_str(&fixed).unwrap_or_else(|e| panic!("{fixed:?} is not JSON: {e}"))
    }

    #[test]
    fn test_missing_comma_between_members() {
        let value = repaired(r#"{"lemma": "test" "definition": "a procedure"}"#);
        assert_eq!(value, json!({"lemma": "test", "definition": "a procedure"}));
    }

    #[test]
    fn test_missing_comma_across_lines_and_in_arrays() {
        let value = repaired("{\n  \"related_words\": [\"stellte\" \"vor\"]\n  \"level\": \"B1\"\n}");
        assert_eq!(value["related_words"], json!(["stellte", "vor"]));
        assert_eq!(value["level"], "B1");
    }

    #[test]
    fn test_single_quotes_and_unquoted_keys() {
        let value = repaired("{lemma: 'vorstellen', level: 'B1'}");
        assert_eq!(value, json!({"lemma": "vorstellen", "level": "B1"}));
    }

    #[test]
    fn test_trailing_commas_and_python_literals() {
        let value = repaired(r#"{"a": [1, 2,], "b": None, "c": True,}"#);
        assert_eq!(value, json!({"a": [1, 2], "b": null, "c": true}));
    }

    #[test]
    fn test_unclosed_containers_and_strings() {
        let value = repaired(r#"{"lemma": "gehen", "related_words": ["geht"#);
        assert_eq!(value, json!({"lemma": "gehen", "related_words": ["geht"]}));

        let value = repaired(r#"{"lemma": "gehen", "level":"#);
        assert_eq!(value, json!({"lemma": "gehen", "level": null}));
    }

    #[test]
    fn test_embedded_quotes_and_newlines() {
        let value = repaired("{\"definition\": \"to say \"hello\" to\nsomeone\"}");
        assert_eq!(value["definition"], "to say \"hello\" to\nsomeone");
    }

    #[test]
    fn test_multi_word_bare_values() {
        let value = repaired("{lemma: run away, level: B1}");
        assert_eq!(value, json!({"lemma": "run away", "level": "B1"}));

        let value = repaired("{lemma: give up\n related_words: [gave up]}");
        assert_eq!(value, json!({"lemma": "give up", "related_words": ["gave up"]}));
    }

    #[test]
    fn test_bare_values_keep_missing_comma_split() {
        let value = repaired("{lemma: run away level: B1}");
        assert_eq!(value, json!({"lemma": "run away", "level": "B1"}));
    }

    #[test]
    fn test_missing_opening_quote() {
        let value = repaired(r#"{"lemma": test", "definition": "x"}"#);
        assert_eq!(value, json!({"lemma": "test", "definition": "x"}));
    }

    #[test]
    fn test_unknown_escape_kept_literally() {
        let value = repaired(r#"{"definition": "a \x b", "lemma": "c\d"}"#);
        assert_eq!(value["definition"], "a \\x b");
        assert_eq!(value["lemma"], "c\\d");

        let value = repaired(r#"{"definition": "caf\u00e9 \"bar\""}"#);
        assert_eq!(value["definition"], "caf\u{e9} \"bar\"");
    }

    #[test]
    fn test_apostrophe_inside_single_quoted_string() {
        let value = repaired("{'definition': 'it's raining'}");
        assert_eq!(value["definition"], "it's raining");
    }

    #[test]
    fn test_extract_from_fence_prose_and_bare() {
        let fenced = "Here you go:\n```json\n{\"lemma\": \"Haus\"}\n```\nBye";
        assert_eq!(extract_json_block(fenced), Some("{\"lemma\": \"Haus\"}"));

        let bare_fence = "```\n{\"lemma\": \"Haus\"}\n```";
        assert_eq!(extract_json_block(bare_fence), Some("{\"lemma\": \"Haus\"}"));

        let prose = "The answer is {\"lemma\": \"Haus\"} I think.";
        assert_eq!(extract_json_block(prose), Some("{\"lemma\": \"Haus\"}"));

        assert_eq!(extract_json_block("no json here"), None);
    }

    #[test]
    fn test_parse_lenient_strict_and_repaired() {
        let strict: Value = parse_lenient("{\"lemma\": \"Haus\"}").unwrap();
        assert_eq!(strict["lemma"], "Haus");

        let fixed: Value = parse_lenient("```json\n{\"lemma\": \"test\" \"definition\": \"x\"}\n```").unwrap();
        assert_eq!(fixed["lemma"], "test");

        assert!(parse_lenient::<Value>("I could not find that word.").is_none());
    }

    #[test]
    fn test_field_helpers() {
        let value = json!({
            "lemma": "  Haus ",
            "empty": "",
            "related_words": "stellte, vor",
            "conjugations": {"plural": "Häuser", "nested": {"x": 1}, "blank": ""}
        });

        assert_eq!(string_field(&value, "lemma").as_deref(), Some("Haus"));
        assert_eq!(string_field(&value, "empty"), None);
        assert_eq!(
            string_list_field(&value, "related_words"),
            Some(vec!["stellte".to_string(), "vor".to_string()])
        );

        let map = string_map_field(&value, "conjugations").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["plural"], "Häuser");
    }
}
