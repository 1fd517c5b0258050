//! Guesses what a fetched subscription body contains.

use std::fmt;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::utils::base64::{base64_decode, is_base64_alphabet};

/// What a subscription body looks like, as far as routing to a parser goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// A Clash config or a bare Clash proxy list.
    Yaml,
    /// Share-links, either Base64-wrapped or in the clear.
    Base64,
    Unknown,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Yaml => "yaml",
            ContentKind::Base64 => "base64",
            ContentKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    static ref CLASH_TOP_LEVEL_KEY: Regex =
        Regex::new(r"(?m)^(mixed-port|allow-lan|mode|port|socks-port|log-level|external-controller)\s*:")
            .unwrap();
    static ref CLASH_SECTION: Regex =
        Regex::new(r"(?m)^(dns|proxies|proxy-groups|proxy-providers|rules)\s*:\s*$").unwrap();
    static ref PROXY_TYPE_LINE: Regex = Regex::new(
        r#"(?mi)^\s*(-\s*)?type\s*:\s*["']?(ss|ssr|vmess|vless|trojan|hysteria2?|http|socks5)["']?\s*$"#
    )
    .unwrap();
    static ref FLOW_MAP_PROXY: Regex = Regex::new(
        r#"(?i)\{[^}]*\btype\s*:\s*["']?(ss|ssr|vmess|vless|trojan|hysteria2?|http|socks5)\b"#
    )
    .unwrap();
    static ref SCHEME_TOKEN: Regex = Regex::new(
        r"(?i)\b(ss|ssr|vmess|vless|trojan|hysteria2|hysteria|hy2|https?|socks5?|tg)://"
    )
    .unwrap();
}

/// Classifies a subscription body
///
/// Checked in order: Clash top-level keys or section headers, a block-style
/// `type:` line naming a supported protocol, an inline flow map naming a
/// supported type (all `yaml`);
/// a Base64 body that decodes to share-links (`base64`); share-links in the
/// clear, which are routed the same way (`base64`); otherwise `unknown`.
pub fn classify_subscription(content: &str) -> ContentKind {
    let text = content.trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return ContentKind::Unknown;
    }

    if CLASH_TOP_LEVEL_KEY.is_match(text) || CLASH_SECTION.is_match(text) {
        debug!("Subscription has Clash top-level keys");
        return ContentKind::Yaml;
    }
    if PROXY_TYPE_LINE.is_match(text) || FLOW_MAP_PROXY.is_match(text) {
        debug!("Subscription has Clash proxy entries");
        return ContentKind::Yaml;
    }

    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if is_base64_alphabet(&compact) {
        if let Some(decoded) = base64_decode(&compact) {
            if SCHEME_TOKEN.is_match(&decoded) {
                debug!("Subscription is Base64-wrapped share-links");
                return ContentKind::Base64;
            }
        }
    }

    if SCHEME_TOKEN.is_match(text) {
        debug!("Subscription is plain share-links");
        return ContentKind::Base64;
    }

    ContentKind::Unknown
}
