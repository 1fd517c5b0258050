//! Line-oriented scanner for the `proxies:` list of a Clash config
//!
//! Only the proxy list is read. Each list item is either a single-line flow
//! map (`- {name: a, type: ss, ...}`) or a block map spread over several
//! indented lines. Flow maps are tried as JSON first and fall back to a
//! forgiving hand-written reader that accepts unquoted scalars (including
//! CJK text and emoji) and trailing commas. Everything outside the list,
//! anchors, tags and multi-line scalars are not supported.

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::utils::json::parse_json_tolerant;

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"^-?(0|[1-9][0-9]*)$").unwrap();
    static ref DECIMAL: Regex = Regex::new(r"^-?(0|[1-9][0-9]*)\.[0-9]+$").unwrap();
}

/// A non-blank, comment-stripped source line.
#[derive(Debug, Clone)]
struct Line {
    indent: usize,
    text: String,
}

/// Extracts the entries of the `proxies:` list as loosely typed maps.
///
/// The list is looked up at the outermost indentation of the document, so
/// the `proxies:` member lists of proxy groups are never mistaken for it.
/// Items that are not mappings are skipped. The list ends at the next key
/// indented no deeper than `proxies:` itself (usually `proxy-groups:` or
/// `rules:`) or at the end of input.
pub fn extract_proxy_maps(content: &str) -> Vec<Map<String, Value>> {
    let lines: Vec<Line> = content
        .trim_start_matches('\u{feff}')
        .lines()
        .filter_map(|raw| {
            let stripped = strip_comment(raw).trim_end();
            let text = stripped.trim_start();
            if text.is_empty() {
                return None;
            }
            Some(Line {
                indent: stripped.len() - text.len(),
                text: text.to_string(),
            })
        })
        .collect();

    // Only a top-level key counts; proxy groups carry nested `proxies:` lists.
    let top = lines.iter().map(|line| line.indent).min().unwrap_or(0);
    let Some(start) = lines.iter().position(|line| {
        line.indent == top && (line.text == "proxies:" || line.text.starts_with("proxies: "))
    }) else {
        debug!("No proxies section found");
        return Vec::new();
    };

    let base = lines[start].indent;
    let inline = lines[start].text["proxies:".len()..].trim();
    if inline.starts_with('[') {
        return match parse_flow(inline) {
            Some(Value::Array(items)) => items.into_iter().filter_map(into_map).collect(),
            _ => {
                warn!("Unreadable inline proxies list");
                Vec::new()
            }
        };
    }

    // The list body: every following line until a sibling key appears.
    let body: Vec<Line> = lines[start + 1..]
        .iter()
        .take_while(|line| line.indent > base || (line.indent == base && is_list_item(&line.text)))
        .cloned()
        .collect();

    let Some(first) = body.first() else {
        return Vec::new();
    };
    let item_indent = first.indent;

    let mut items = Vec::new();
    let mut idx = 0;
    while idx < body.len() {
        let line = &body[idx];
        if line.indent != item_indent || !is_list_item(&line.text) {
            debug!("Skipping stray line in proxies list: {}", line.text);
            idx += 1;
            continue;
        }

        let content = line.text[1..].trim_start();
        let content_indent = line.indent + (line.text.len() - content.len());

        if content.starts_with('{') {
            // A flow map may wrap onto following lines until braces balance.
            let mut text = content.to_string();
            idx += 1;
            while brace_depth(&text) > 0 && idx < body.len() && body[idx].indent > item_indent {
                text.push(' ');
                text.push_str(&body[idx].text);
                idx += 1;
            }
            match parse_flow_map(&text) {
                Some(map) => items.push(map),
                None => warn!("Unreadable proxy entry: {}", text),
            }
            continue;
        }

        // Block map: the dash line plus every deeper line.
        let mut block = vec![Line {
            indent: content_indent,
            text: content.to_string(),
        }];
        idx += 1;
        while idx < body.len() && body[idx].indent > item_indent {
            block.push(body[idx].clone());
            idx += 1;
        }
        let mut cursor = 0;
        match parse_node(&mut block, &mut cursor, content_indent) {
            Value::Object(map) => items.push(map),
            other => debug!("Ignoring non-map proxy entry: {}", other),
        }
    }

    items
}

fn is_list_item(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

fn into_map(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Parses a flow map, strict JSON first.
pub fn parse_flow_map(text: &str) -> Option<Map<String, Value>> {
    if let Some(Value::Object(map)) = parse_json_tolerant(text) {
        return Some(map);
    }
    parse_flow(text).and_then(into_map)
}

/// Parses whatever sits at `lines[*cursor]` at the given indentation:
/// a block list, a block map or a lone scalar.
fn parse_node(lines: &mut [Line], cursor: &mut usize, indent: usize) -> Value {
    let Some(line) = lines.get(*cursor) else {
        return Value::Null;
    };
    if is_list_item(&line.text) {
        parse_block_list(lines, cursor, indent)
    } else if split_key(&line.text).is_some() {
        Value::Object(parse_block_map(lines, cursor, indent))
    } else {
        *cursor += 1;
        coerce_scalar(&line.text)
    }
}

fn parse_block_map(lines: &mut [Line], cursor: &mut usize, indent: usize) -> Map<String, Value> {
    let mut map = Map::new();

    while *cursor < lines.len() {
        let line = &lines[*cursor];
        if line.indent < indent {
            break;
        }
        if line.indent > indent {
            debug!("Skipping over-indented line: {}", line.text);
            *cursor += 1;
            continue;
        }
        let Some((key, rest)) = split_key(&line.text) else {
            break;
        };
        let (key, rest) = (key.to_string(), rest.to_string());
        *cursor += 1;

        let value = if !rest.is_empty() {
            scalar_or_flow(&rest)
        } else {
            match lines.get(*cursor) {
                Some(next) if next.indent > indent => {
                    let child = next.indent;
                    parse_node(lines, cursor, child)
                }
                // Block lists are often written at the same indent as their key.
                Some(next) if next.indent == indent && is_list_item(&next.text) => {
                    parse_block_list(lines, cursor, indent)
                }
                _ => Value::Null,
            }
        };
        map.insert(key, value);
    }

    map
}

fn parse_block_list(lines: &mut [Line], cursor: &mut usize, indent: usize) -> Value {
    let mut items = Vec::new();

    while *cursor < lines.len() {
        let line = &lines[*cursor];
        if line.indent != indent || !is_list_item(&line.text) {
            break;
        }
        let content = line.text[1..].trim_start().to_string();
        let content_indent = line.indent + (line.text.len() - content.len());

        if content.is_empty() {
            *cursor += 1;
            let value = match lines.get(*cursor) {
                Some(next) if next.indent > indent => {
                    let child = next.indent;
                    parse_node(lines, cursor, child)
                }
                _ => Value::Null,
            };
            items.push(value);
        } else if split_key(&content).is_some() && !content.starts_with('{') {
            // `- key: value` opens a map whose keys line up with `key`.
            lines[*cursor] = Line {
                indent: content_indent,
                text: content,
            };
            items.push(Value::Object(parse_block_map(lines, cursor, content_indent)));
        } else {
            *cursor += 1;
            items.push(scalar_or_flow(&content));
        }
    }

    Value::Array(items)
}

fn scalar_or_flow(text: &str) -> Value {
    if text.starts_with('{') || text.starts_with('[') {
        if let Some(value) = parse_json_tolerant(text).or_else(|| parse_flow(text)) {
            return value;
        }
    }
    coerce_scalar(text)
}

/// Splits `key: value` at the first colon that is followed by whitespace
/// or the end of the line and sits outside quotes.
fn split_key(text: &str) -> Option<(String, &str)> {
    if text.starts_with('{') || text.starts_with('[') {
        return None;
    }
    let bytes = text.as_bytes();
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if (b == b'"' || b == b'\'') && i == 0 => quote = Some(b),
            None if b == b':' && (i + 1 == bytes.len() || bytes[i + 1].is_ascii_whitespace()) => {
                let key = unquote(text[..i].trim());
                if key.is_empty() {
                    return None;
                }
                return Some((key, text[i + 1..].trim()));
            }
            None => {}
        }
    }
    None
}

/// Removes a trailing `# comment` that sits outside quotes.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) => {
                return &line[..i];
            }
            None => {}
        }
    }
    line
}

fn brace_depth(text: &str) -> i32 {
    let mut depth = 0;
    let mut quote: Option<char> = None;
    for c in text.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '{' | '[' => depth += 1,
                '}' | ']' => depth -= 1,
                _ => {}
            },
        }
    }
    depth
}

/// Applies the block-scalar coercion rules: booleans, null, numbers,
/// quoted strings, otherwise the raw text.
pub fn coerce_scalar(raw: &str) -> Value {
    let text = raw.trim();
    match text {
        "" | "null" | "Null" | "NULL" | "~" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if is_quoted(text) {
        return Value::String(unquote(text));
    }
    if INTEGER.is_match(text) {
        if let Ok(n) = text.parse::<i64>() {
            return Value::Number(n.into());
        }
    }
    if DECIMAL.is_match(text) {
        if let Some(n) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(text.to_string())
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')))
}

fn unquote(text: &str) -> String {
    if !is_quoted(text) {
        return text.to_string();
    }
    if text.starts_with('"') {
        serde_json::from_str::<String>(text).unwrap_or_else(|_| text[1..text.len() - 1].to_string())
    } else {
        text[1..text.len() - 1].replace("''", "'")
    }
}

/// Parses a YAML flow collection (`{...}` or `[...]`).
fn parse_flow(text: &str) -> Option<Value> {
    let mut parser = FlowParser {
        chars: text.chars().collect(),
        pos: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos == parser.chars.len() {
        Some(value)
    } else {
        None
    }
}

struct FlowParser {
    chars: Vec<char>,
    pos: usize,
}

impl FlowParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Option<Value> {
        self.skip_ws();
        match self.peek()? {
            '{' => self.map().map(Value::Object),
            '[' => self.list().map(Value::Array),
            '"' | '\'' => self.quoted().map(Value::String),
            _ => {
                let raw = self.plain(&[',', '}', ']']);
                Some(coerce_scalar(&raw))
            }
        }
    }

    fn map(&mut self) -> Option<Map<String, Value>> {
        self.pos += 1;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            match self.peek()? {
                '}' => {
                    self.pos += 1;
                    return Some(map);
                }
                ',' => {
                    self.pos += 1;
                    continue;
                }
                _ => {}
            }

            let key = match self.peek()? {
                '"' | '\'' => self.quoted()?,
                _ => self.key()?,
            };
            self.skip_ws();
            if self.peek()? != ':' {
                return None;
            }
            self.pos += 1;

            self.skip_ws();
            let value = match self.peek()? {
                ',' | '}' => Value::Null,
                _ => self.value()?,
            };
            map.insert(key, value);
        }
    }

    fn list(&mut self) -> Option<Vec<Value>> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek()? {
                ']' => {
                    self.pos += 1;
                    return Some(items);
                }
                ',' => {
                    self.pos += 1;
                }
                _ => items.push(self.value()?),
            }
        }
    }

    /// An unquoted key ends at the first `:` followed by whitespace or a
    /// flow delimiter, so `server: 2001:db8::1` keeps the colons in the value.
    fn key(&mut self) -> Option<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ':' {
                let next = self.chars.get(self.pos + 1).copied();
                if next.map_or(true, |n| n.is_whitespace() || matches!(n, ',' | '}' | '"' | '\'')) {
                    break;
                }
            }
            if matches!(c, ',' | '}') {
                return None;
            }
            self.pos += 1;
        }
        let key: String = self.chars[start..self.pos].iter().collect();
        let key = key.trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }

    fn plain(&mut self, stops: &[char]) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect::<String>().trim().to_string()
    }

    fn quoted(&mut self) -> Option<String> {
        let quote = self.peek()?;
        self.pos += 1;
        let mut out = String::new();
        loop {
            let c = self.peek()?;
            self.pos += 1;
            if quote == '\'' {
                if c == '\'' {
                    if self.peek() == Some('\'') {
                        out.push('\'');
                        self.pos += 1;
                        continue;
                    }
                    return Some(out);
                }
                out.push(c);
                continue;
            }
            match c {
                '"' => return Some(out),
                '\\' => {
                    let escaped = self.peek()?;
                    self.pos += 1;
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                _ => out.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flow_map_with_unquoted_values() {
        let yaml = "proxies:\n  - {name: 香港 01 🇭🇰, type: ss, server: hk.example.com, port: 8388, cipher: aes-128-gcm, password: pass, udp: true,}\n";
        let maps = extract_proxy_maps(yaml);
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0]["name"], json!("香港 01 🇭🇰"));
        assert_eq!(maps[0]["port"], json!(8388));
        assert_eq!(maps[0]["udp"], json!(true));
    }

    #[test]
    fn test_block_map_with_nesting() {
        let yaml = r#"
mixed-port: 7890
proxies:
  - name: "vmess ws"   # comment
    type: vmess
    server: 1.2.3.4
    port: 443
    uuid: b831381d-6324-4d53-ad4f-8cda48b30811
    alterId: 0
    tls: true
    network: ws
    ws-opts:
      path: /ray
      headers:
        Host: cdn.example.com
    alpn:
      - h2
      - http/1.1
  - name: 'it''s'
    type: trojan
    server: t.example.com
    port: 443
    password: ~
proxy-groups:
  - name: Proxy
    type: select
"#;
        let maps = extract_proxy_maps(yaml);
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0]["name"], json!("vmess ws"));
        assert_eq!(maps[0]["tls"], json!(true));
        assert_eq!(maps[0]["ws-opts"]["headers"]["Host"], json!("cdn.example.com"));
        assert_eq!(maps[0]["alpn"], json!(["h2", "http/1.1"]));
        assert_eq!(maps[1]["name"], json!("it's"));
        assert_eq!(maps[1]["password"], json!(null));
    }

    #[test]
    fn test_list_at_key_indent_and_ipv6() {
        let yaml = "proxies:\n- {name: v6, type: http, server: 2001:db8::1, port: 8080}\n- name: b\n  type: socks5\n  server: s.com\n  port: 1080\nrules:\n  - MATCH,DIRECT\n";
        let maps = extract_proxy_maps(yaml);
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0]["server"], json!("2001:db8::1"));
        assert_eq!(maps[1]["type"], json!("socks5"));
    }

    #[test]
    fn test_coerce_scalar() {
        assert_eq!(coerce_scalar("443"), json!(443));
        assert_eq!(coerce_scalar("1.5"), json!(1.5));
        assert_eq!(coerce_scalar("0123"), json!("0123"));
        assert_eq!(coerce_scalar("'443'"), json!("443"));
        assert_eq!(coerce_scalar("null"), json!(null));
        assert_eq!(coerce_scalar("False"), json!(false));
        assert_eq!(coerce_scalar("aes-128-gcm"), json!("aes-128-gcm"));
    }

    #[test]
    fn test_groups_before_proxies() {
        let block = "proxy-groups:\n  - name: Proxy\n    type: select\n    proxies:\n      - HK\nproxies:\n  - {name: HK, type: trojan, server: t.com, port: 443, password: x}\n";
        let maps = extract_proxy_maps(block);
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0]["server"], json!("t.com"));

        let inline = "proxy-groups:\n  - name: Proxy\n    type: select\n    proxies: [HK]\nproxies:\n  - name: HK\n    type: trojan\n    server: t.com\n    port: 443\n    password: x\nrules:\n  - MATCH,Proxy\n";
        let maps = extract_proxy_maps(inline);
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0]["name"], json!("HK"));

        let top_level_inline = "proxy-groups:\n  - {name: Proxy, type: select, proxies: [HK]}\nproxies: [{name: HK, type: trojan, server: t.com, port: 443, password: x}]\n";
        assert_eq!(extract_proxy_maps(top_level_inline).len(), 1);
    }

    #[test]
    fn test_nested_proxies_key_alone_is_not_a_list() {
        let yaml = "proxy-groups:\n  - name: Proxy\n    type: select\n    proxies:\n      - HK\n";
        assert!(extract_proxy_maps(yaml).is_empty());
    }

    #[test]
    fn test_no_proxies_section() {
        assert!(extract_proxy_maps("mode: rule\nrules:\n  - MATCH,DIRECT").is_empty());
    }
}
