//! Shadowsocks plugin option helpers
//!
//! Links and sing-box carry plugin options in the SIP002 form
//! `obfs=http;obfs-host=example.com`, Clash carries them as a
//! `plugin-opts` mapping with its own key names.

use serde_json::{Map, Value};

use super::json::value_as_string;

/// Splits SIP002 plugin options into ordered pairs. Bare flags such as
/// `tls` map to an empty value.
pub fn split_plugin_opts(opts: &str) -> Vec<(String, String)> {
    opts.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (part.to_string(), String::new()),
        })
        .collect()
}

/// Joins ordered pairs back into the SIP002 form.
pub fn join_plugin_opts(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            if value.is_empty() {
                key.clone()
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Converts a SIP002 plugin into the Clash `plugin` name and `plugin-opts`.
pub fn plugin_to_clash(plugin: &str, opts: Option<&str>) -> (String, Map<String, Value>) {
    let pairs = opts.map(split_plugin_opts).unwrap_or_default();
    let mut map = Map::new();

    match plugin {
        "obfs-local" | "simple-obfs" | "obfs" => {
            if let Some(mode) = lookup(&pairs, "obfs") {
                map.insert("mode".to_string(), Value::from(mode));
            }
            if let Some(host) = lookup(&pairs, "obfs-host") {
                map.insert("host".to_string(), Value::from(host));
            }
            ("obfs".to_string(), map)
        }
        "v2ray-plugin" => {
            let mode = lookup(&pairs, "mode").unwrap_or("websocket");
            map.insert("mode".to_string(), Value::from(mode));
            if let Some(host) = lookup(&pairs, "host") {
                map.insert("host".to_string(), Value::from(host));
            }
            if let Some(path) = lookup(&pairs, "path") {
                map.insert("path".to_string(), Value::from(path));
            }
            if lookup(&pairs, "tls").is_some() {
                map.insert("tls".to_string(), Value::Bool(true));
            }
            if lookup(&pairs, "mux").is_some() {
                map.insert("mux".to_string(), Value::Bool(true));
            }
            ("v2ray-plugin".to_string(), map)
        }
        other => {
            for (key, value) in pairs {
                map.insert(key, Value::String(value));
            }
            (other.to_string(), map)
        }
    }
}

/// Converts a Clash `plugin` / `plugin-opts` pair back to SIP002.
pub fn plugin_from_clash(plugin: &str, opts: Option<&Map<String, Value>>) -> (String, Option<String>) {
    let empty = Map::new();
    let opts = opts.unwrap_or(&empty);
    let text = |key: &str| opts.get(key).and_then(value_as_string);
    let flag = |key: &str| matches!(opts.get(key), Some(Value::Bool(true)));

    let (name, pairs) = match plugin {
        "obfs" | "obfs-local" | "simple-obfs" => {
            let mut pairs = Vec::new();
            if let Some(mode) = text("mode") {
                pairs.push(("obfs".to_string(), mode));
            }
            if let Some(host) = text("host") {
                pairs.push(("obfs-host".to_string(), host));
            }
            ("obfs-local".to_string(), pairs)
        }
        "v2ray-plugin" => {
            let mut pairs = vec![(
                "mode".to_string(),
                text("mode").unwrap_or_else(|| "websocket".to_string()),
            )];
            if let Some(host) = text("host") {
                pairs.push(("host".to_string(), host));
            }
            if let Some(path) = text("path") {
                pairs.push(("path".to_string(), path));
            }
            if flag("tls") {
                pairs.push(("tls".to_string(), String::new()));
            }
            if flag("mux") {
                pairs.push(("mux".to_string(), String::new()));
            }
            ("v2ray-plugin".to_string(), pairs)
        }
        other => {
            let pairs = opts
                .iter()
                .filter_map(|(key, value)| value_as_string(value).map(|v| (key.clone(), v)))
                .collect();
            (other.to_string(), pairs)
        }
    };

    let joined = join_plugin_opts(&pairs);
    (name, if joined.is_empty() { None } else { Some(joined) })
}
