use std::sync::Arc;

use log::warn;
use serde_json::{json, Value};

use crate::error::Result;
use crate::generator::adapters::AdapterRegistry;
use crate::generator::templates::{
    singbox_builtin_outbounds, singbox_dns, singbox_groups, singbox_inbounds, singbox_log,
    singbox_route,
};
use crate::interfaces::{Format, ProxyGenerator};
use crate::models::{Proxy, ProxyType};
use crate::settings::Settings;

/// Protocols with a sing-box outbound.
pub const SINGBOX_PROTOCOLS: [ProxyType; 7] = [
    ProxyType::Shadowsocks,
    ProxyType::VMess,
    ProxyType::Vless,
    ProxyType::Trojan,
    ProxyType::Hysteria,
    ProxyType::Hysteria2,
    ProxyType::Http,
];

/// Convert proxies to a sing-box configuration
///
/// Outbounds are ordered: group selectors, proxies, then the built-in
/// `direct`/`block`/`dns` outbounds.
pub struct SingBoxGenerator {
    adapters: Arc<AdapterRegistry>,
    settings: Settings,
}

impl SingBoxGenerator {
    pub fn new(adapters: Arc<AdapterRegistry>, settings: &Settings) -> Self {
        SingBoxGenerator {
            adapters,
            settings: settings.clone(),
        }
    }

    pub fn build_config(&self, proxies: &[Proxy]) -> Result<Value> {
        let mut proxy_outbounds = Vec::with_capacity(proxies.len());
        let mut names = Vec::with_capacity(proxies.len());
        for proxy in proxies {
            match self.adapters.for_proxy(proxy)?.to_singbox(proxy) {
                Some(outbound) => {
                    proxy_outbounds.push(outbound);
                    names.push(proxy.name.clone());
                }
                None => warn!("No sing-box outbound for {} proxy {}", proxy.proxy_type(), proxy.name),
            }
        }

        let mut outbounds = singbox_groups(&names, &self.settings);
        outbounds.extend(proxy_outbounds);
        outbounds.extend(singbox_builtin_outbounds());

        Ok(json!({
            "log": singbox_log(&self.settings),
            "dns": singbox_dns(),
            "inbounds": singbox_inbounds(&self.settings),
            "outbounds": outbounds,
            "route": singbox_route(),
        }))
    }
}

impl ProxyGenerator for SingBoxGenerator {
    fn format(&self) -> Format {
        Format::SingBox
    }

    fn supported_protocols(&self) -> &'static [ProxyType] {
        &SINGBOX_PROTOCOLS
    }

    fn generate(&self, proxies: &[Proxy]) -> Result<String> {
        let config = self.build_config(proxies)?;
        Ok(serde_json::to_string_pretty(&config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HttpSettings, Hysteria2Settings, ProxySettings, VlessSettings};
    use crate::parser::parse_singbox_json;

    fn generator(settings: &Settings) -> SingBoxGenerator {
        SingBoxGenerator::new(Arc::new(AdapterRegistry::with_defaults().unwrap()), settings)
    }

    fn sample() -> Vec<Proxy> {
        vec![
            Proxy::new(
                "v",
                "v.example.com",
                443,
                ProxySettings::Vless(VlessSettings {
                    uuid: "b831381d-6324-4d53-ad4f-8cda48b30811".to_string(),
                    tls: true,
                    servername: Some("v.example.com".to_string()),
                    flow: Some("xtls-rprx-vision".to_string()),
                    ..Default::default()
                }),
            ),
            Proxy::new(
                "h2",
                "h.example.com",
                8443,
                ProxySettings::Hysteria2(Hysteria2Settings {
                    password: "pw".to_string(),
                    skip_cert_verify: true,
                    ..Default::default()
                }),
            ),
            Proxy::new("web", "10.1.1.1", 3128, ProxySettings::Http(HttpSettings::default())),
        ]
    }

    #[test]
    fn test_config_layout() {
        let mut settings = Settings::default();
        settings.singbox_mixed_port = 7080;
        let config = generator(&settings).build_config(&sample()).unwrap();

        assert_eq!(config["inbounds"][0]["listen_port"], json!(7080));
        let outbounds = config["outbounds"].as_array().unwrap();
        assert_eq!(outbounds[0]["tag"], json!("Proxy"));
        assert_eq!(outbounds[0]["outbounds"], json!(["Auto", "v", "h2", "web", "direct"]));
        assert_eq!(outbounds[1]["type"], json!("urltest"));
        assert_eq!(outbounds[1]["interval"], json!("300s"));
        assert_eq!(outbounds.last().unwrap()["type"], json!("dns"));
    }

    #[test]
    fn test_output_round_trips() {
        let output = generator(&Settings::default()).generate(&sample()).unwrap();
        let outcome = parse_singbox_json(&output);
        assert_eq!(outcome.proxies, sample());
        assert!(outcome.unsupported.is_empty());
    }
}
