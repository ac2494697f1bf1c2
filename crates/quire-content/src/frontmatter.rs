//! Frontmatter extraction.
//!
//! A frontmatter block is delimited by a first line of `---` and the next line
//! that is exactly `---`. Each top-level `key: value` line becomes one entry.
//!
//! Values are read as YAML scalars, so numbers, booleans, `null`, quoted
//! strings and flow lists (`[a, b]`) keep their type. Quote a value to force a
//! literal string (`version: "1.10"`). Lines that don't look like
//! `key: value` are skipped without error, and a missing or unterminated
//! block yields an empty map.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

const DELIMITER: &str = "---";

/// Key/value metadata declared at the top of a content file.
///
/// Keys are kept sorted so that iteration order is stable.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Frontmatter(BTreeMap<String, Value>);

impl Frontmatter {
    /// Get a raw value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a value as display text.
    ///
    /// Strings are trimmed; numbers and booleans are formatted. Returns `None`
    /// for missing keys, blank strings, nulls, lists and maps.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Check whether `key` is explicitly set to a falsy value.
    ///
    /// Falsy values are `false`, `0`, and the strings `"false"`, `"no"`,
    /// `"off"`, `"0"` and `""`. Missing keys and `null` are not falsy.
    pub fn is_falsy(&self, key: &str) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => !b,
            Some(Value::Number(n)) => n.as_f64() == Some(0.0),
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "" | "false" | "no" | "off" | "0"
            ),
            _ => false,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no keys were declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Extract frontmatter from a file's source.
///
/// Total: never fails. Later duplicate keys overwrite earlier ones.
pub fn extract(source: &str) -> Frontmatter {
    let Some((block, _)) = split(source) else {
        return Frontmatter::default();
    };
    block.lines().filter_map(parse_line).collect()
}

/// Return the document body with the frontmatter block removed.
///
/// Returns `source` unchanged when there is no complete block.
pub fn strip(source: &str) -> &str {
    split(source).map_or(source, |(_, body)| body)
}

/// Check whether `source` opens a frontmatter block that is never closed.
pub fn is_unterminated(source: &str) -> bool {
    opens_block(source) && split(source).is_none()
}

fn opens_block(source: &str) -> bool {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    source
        .split_inclusive('\n')
        .next()
        .is_some_and(|first| first.trim_end() == DELIMITER)
}

/// Split `source` into `(block, body)`.
fn split(source: &str) -> Option<(&str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = source.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Some((&source[block_start..offset], &source[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn parse_line(line: &str) -> Option<(String, Value)> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let (key, raw) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.starts_with('#') || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key.to_owned(), parse_value(raw.trim())))
}

fn parse_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Object(_)) | Err(_) => Value::String(raw.to_owned()),
        Ok(value) => value,
    }
}
