//! Lenient JSON helpers
//!
//! Subscription payloads are hand-edited more often than not, so parsing
//! forgives a BOM and trailing commas, and field readers accept the usual
//! string/number/bool confusion (`"443"` vs `443`, `"1"` vs `true`).

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    static ref TRAILING_COMMA: Regex = Regex::new(r",(\s*[}\]])").unwrap();
}

/// Parses JSON, retrying once with trailing commas removed.
pub fn parse_json_tolerant(input: &str) -> Option<Value> {
    let input = input.trim_start_matches('\u{feff}').trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str(input) {
        return Some(value);
    }
    let cleaned = TRAILING_COMMA.replace_all(input, "$1");
    serde_json::from_str(&cleaned).ok()
}

/// Reads a non-empty string field, stringifying numbers and booleans.
pub fn json_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    value_as_string(map.get(key)?)
}

/// Reads the first present non-empty string among several key aliases.
pub fn json_str_any(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| json_str(map, key))
}

/// Stringifies a scalar value; `null`, empty strings and containers yield `None`.
pub fn value_as_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Reads an unsigned integer from a number or a numeric string.
pub fn json_u64(map: &Map<String, Value>, key: &str) -> Option<u64> {
    match map.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a port, treating a missing, malformed or zero value as absent.
pub fn json_port(map: &Map<String, Value>, key: &str) -> Option<u16> {
    json_u64(map, key)
        .filter(|port| *port > 0)
        .and_then(|port| u16::try_from(port).ok())
}

/// Reads a boolean from a bool, a 0/1 number or a truthy/falsy string.
pub fn json_bool(map: &Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Reads a nested object field.
pub fn json_object<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key)?.as_object()
}

/// Reads either a list of strings or a single comma-separated string.
pub fn json_string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(value_as_string).collect(),
        Some(value) => value_as_string(value)
            .map(|s| {
                s.split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        None => Vec::new(),
    }
}
