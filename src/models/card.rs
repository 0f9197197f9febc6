use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A catalog entry exactly as it appears in `cards.json`, before validation.
/// Fields stay untyped so one malformed entry cannot fail the whole file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub word: Value,
    #[serde(default, alias = "forbidden")]
    pub taboo: Value,
}

impl RawEntry {
    #[cfg(test)]
    pub fn new(word: &str, taboo: &[&str]) -> Self {
        Self {
            word: Value::from(word),
            taboo: Value::from(taboo.to_vec()),
        }
    }
}

/// Scalars become text; null, arrays and objects do not
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A validated card: non-empty word with at least one forbidden word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub word: String,
    pub forbidden: Vec<String>,
}

impl Card {
    /// Trim the raw entry and drop blank forbidden words.
    /// Returns `None` when nothing playable is left.
    pub fn from_raw(entry: &RawEntry) -> Option<Self> {
        let word = scalar_text(&entry.word).filter(|w| !w.is_empty())?;
        let forbidden: Vec<String> = match &entry.taboo {
            Value::Array(items) => items
                .iter()
                .filter_map(scalar_text)
                .filter(|item| !item.is_empty())
                .collect(),
            _ => Vec::new(),
        };

        if forbidden.is_empty() {
            return None;
        }

        Some(Self { word, forbidden })
    }
}
