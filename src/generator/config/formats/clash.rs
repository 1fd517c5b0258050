use std::sync::Arc;

use log::warn;
use serde_json::Value;

use crate::error::Result;
use crate::generator::adapters::AdapterRegistry;
use crate::generator::templates::{clash_groups, clash_header, clash_rules, CLASH_DNS};
use crate::interfaces::{Format, ProxyGenerator};
use crate::models::{Proxy, ProxyType};
use crate::settings::Settings;

/// Protocols Clash Premium understands.
pub const CLASH_PREMIUM_PROTOCOLS: [ProxyType; 6] = [
    ProxyType::Shadowsocks,
    ProxyType::ShadowsocksR,
    ProxyType::VMess,
    ProxyType::Trojan,
    ProxyType::Http,
    ProxyType::Socks5,
];

/// Clash configuration generator
///
/// `clash-meta` and `clash-premium` share the layout and differ only in the
/// protocols they accept. Proxies and groups are written one flow map per
/// line, in JSON-compatible quoting.
pub struct ClashGenerator {
    format: Format,
    supported: &'static [ProxyType],
    adapters: Arc<AdapterRegistry>,
    settings: Settings,
}

impl ClashGenerator {
    pub fn meta(adapters: Arc<AdapterRegistry>, settings: &Settings) -> Self {
        ClashGenerator {
            format: Format::ClashMeta,
            supported: &ProxyType::ALL,
            adapters,
            settings: settings.clone(),
        }
    }

    pub fn premium(adapters: Arc<AdapterRegistry>, settings: &Settings) -> Self {
        ClashGenerator {
            format: Format::ClashPremium,
            supported: &CLASH_PREMIUM_PROTOCOLS,
            adapters,
            settings: settings.clone(),
        }
    }

    /// The `proxies:` entries and the names they were written under.
    fn proxy_entries(&self, proxies: &[Proxy]) -> Result<(Vec<String>, Vec<String>)> {
        let mut lines = Vec::with_capacity(proxies.len());
        let mut names = Vec::with_capacity(proxies.len());
        for proxy in proxies {
            let Some(entry) = self.adapters.for_proxy(proxy)?.to_clash(proxy) else {
                warn!("No Clash form for {} proxy {}", proxy.proxy_type(), proxy.name);
                continue;
            };
            lines.push(serde_json::to_string(&Value::Object(entry))?);
            names.push(proxy.name.clone());
        }
        Ok((lines, names))
    }
}

impl ProxyGenerator for ClashGenerator {
    fn format(&self) -> Format {
        self.format
    }

    fn supported_protocols(&self) -> &'static [ProxyType] {
        self.supported
    }

    fn generate(&self, proxies: &[Proxy]) -> Result<String> {
        let (entries, names) = self.proxy_entries(proxies)?;

        let mut output = clash_header(&self.settings);
        output.push_str(CLASH_DNS);

        if entries.is_empty() {
            output.push_str("proxies: []\n");
        } else {
            output.push_str("proxies:\n");
            for entry in &entries {
                output.push_str("  - ");
                output.push_str(entry);
                output.push('\n');
            }
        }

        output.push_str("proxy-groups:\n");
        for group in clash_groups(&names, &self.settings) {
            output.push_str("  - ");
            output.push_str(&serde_json::to_string(&group)?);
            output.push('\n');
        }

        output.push_str("rules:\n");
        for rule in clash_rules() {
            output.push_str("  - ");
            output.push_str(&rule);
            output.push('\n');
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProxySettings, ShadowsocksSettings, VMessSettings};
    use crate::parser::{classify_subscription, parse_clash_yaml, ContentKind};

    fn adapters() -> Arc<AdapterRegistry> {
        Arc::new(AdapterRegistry::with_defaults().unwrap())
    }

    fn sample() -> Vec<Proxy> {
        vec![
            Proxy::new(
                "香港 🇭🇰 01",
                "hk.example.com",
                8388,
                ProxySettings::Shadowsocks(ShadowsocksSettings {
                    cipher: "aes-256-gcm".to_string(),
                    password: "it's \"quoted\"".to_string(),
                    ..Default::default()
                }),
            ),
            Proxy::new(
                "vm",
                "2001:db8::5",
                443,
                ProxySettings::VMess(VMessSettings {
                    uuid: "b831381d-6324-4d53-ad4f-8cda48b30811".to_string(),
                    tls: true,
                    ..Default::default()
                }),
            ),
        ]
    }

    #[test]
    fn test_output_round_trips() {
        let generator = ClashGenerator::meta(adapters(), &Settings::default());
        let output = generator.generate(&sample()).unwrap();

        assert!(output.starts_with("mixed-port: 7890\n"));
        assert!(output.contains("\n  - {\"type\":\"ss\",\"name\":\"香港 🇭🇰 01\""));
        assert_eq!(classify_subscription(&output), ContentKind::Yaml);

        let outcome = parse_clash_yaml(&output);
        assert_eq!(outcome.proxies, sample());
        assert!(outcome.unsupported.is_empty());
    }

    #[test]
    fn test_groups_list_proxy_names() {
        let generator = ClashGenerator::premium(adapters(), &Settings::default());
        let output = generator.generate(&sample()).unwrap();
        assert!(output.contains(
            "{\"name\":\"Proxy\",\"type\":\"select\",\"proxies\":[\"Auto\",\"Fallback\",\"DIRECT\",\"香港 🇭🇰 01\",\"vm\"]}"
        ));
        assert!(output.trim_end().ends_with("- MATCH,Final"));
    }

    #[test]
    fn test_empty_proxy_list() {
        let generator = ClashGenerator::meta(adapters(), &Settings::default());
        let output = generator.generate(&[]).unwrap();
        assert!(output.contains("proxies: []\n"));
        assert!(parse_clash_yaml(&output).proxies.is_empty());
    }

    #[test]
    fn test_premium_capabilities() {
        let generator = ClashGenerator::premium(adapters(), &Settings::default());
        assert!(generator.supports(ProxyType::Socks5));
        assert!(!generator.supports(ProxyType::Vless));
        assert_eq!(generator.format(), Format::ClashPremium);
    }
}
