//! Text extraction and tokenization.
//!
//! [`extract_text`] flattens an arbitrary nested document body into a plain
//! lower-cased string, skipping non-semantic fields (identifiers, version
//! numbers, timestamps). [`tokenize`] splits the result into a normalized
//! token sequence with short tokens and stopwords removed.
//!
//! Both functions are pure: identical input always yields identical output,
//! which the fusion layer relies on for deterministic rankings.

use serde_json::Value;

/// Map keys carrying identifiers or bookkeeping rather than content.
const NON_SEMANTIC_KEYS: &[&str] = &["id", "version", "created_at", "updated_at"];

/// Minimum token length kept by [`tokenize`]. Shorter tokens are noise.
const MIN_TOKEN_CHARS: usize = 3;

/// Mixed Turkish/English stopword set. Source documents are bilingual, so
/// both languages contribute high-frequency function words.
const STOPWORDS: &[&str] = &[
    "bir", "bu", "ve", "için", "ile", "olarak", "ise", "gibi", "the", "is", "at", "which", "on",
    "and", "or", "not", "are", "was",
];

/// Flatten a document body into a single plain-text string.
///
/// Recurses over maps (in key order), lists (in element order), and scalar
/// leaves. Only string leaves contribute; numbers, bools, and nulls carry
/// no searchable text. Map entries under a key in [`NON_SEMANTIC_KEYS`] are
/// skipped entirely, subtrees included.
///
/// The output is lower-cased with runs of whitespace collapsed to single
/// spaces.
pub fn extract_text(body: &Value) -> String {
    let mut parts: Vec<String> = Vec::new();
    collect_text(body, &mut parts);
    parts.join(" ")
}

fn collect_text(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if NON_SEMANTIC_KEYS.contains(&key.as_str()) {
                    continue;
                }
                collect_text(child, parts);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text(item, parts);
            }
        }
        Value::String(s) => {
            let cleaned = clean_text(s);
            if !cleaned.is_empty() {
                parts.push(cleaned);
            }
        }
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

/// Lower-case and collapse whitespace.
fn clean_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Split text into normalized tokens.
///
/// Splits on word boundaries (Unicode-aware, so Turkish characters
/// survive; underscores count as word characters, keeping snake_case
/// identifiers whole), lower-cases, then drops tokens shorter than
/// [`MIN_TOKEN_CHARS`] and tokens in the stopword set.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|t| !STOPWORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}
