use linked_hash_map::LinkedHashMap;
use log::{debug, warn};

use crate::error::Result;
use crate::generator::templates::{loon_groups, loon_rules, LOON_GENERAL, LOON_TRAILER};
use crate::interfaces::{Format, ProxyGenerator};
use crate::models::{
    ParsedProxy, Proxy, ProxySettings, ProxyType, ShadowsocksRSettings, ShadowsocksSettings,
    TrojanSettings, VMessSettings, WsOptions,
};
use crate::parser::explodes::ssr::ssr_wire_cipher;
use crate::parser::node_manip::dedupe_names;
use crate::settings::Settings;
use crate::utils::plugin::split_plugin_opts;

/// Protocols Loon understands.
pub const LOON_PROTOCOLS: [ProxyType; 4] = [
    ProxyType::Shadowsocks,
    ProxyType::ShadowsocksR,
    ProxyType::VMess,
    ProxyType::Trojan,
];

/// Loon configuration generator
///
/// Writes `[General]`, `[Proxy]`, `[Proxy Group]` and `[Rule]` followed by the
/// static remote-rule, rewrite, host, script and MITM sections. Each proxy is
/// one `name = Type,server,port,...` line.
pub struct LoonGenerator {
    settings: Settings,
}

impl LoonGenerator {
    pub fn new(settings: &Settings) -> Self {
        LoonGenerator {
            settings: settings.clone(),
        }
    }
}

/// Loon splits lines on `,` and `=`, so neither may appear in a name.
fn loon_name(name: &str) -> String {
    name.replace([',', '='], "_")
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

fn ws_params(params: &mut Vec<String>, ws: Option<&WsOptions>) {
    if let Some(ws) = ws {
        params.push(format!("path={}", ws.path));
        if let Some(host) = &ws.host {
            params.push(format!("host={}", host));
        }
    }
}

fn shadowsocks_line(proxy: &Proxy, ss: &ShadowsocksSettings) -> Vec<String> {
    let mut params = vec![
        "Shadowsocks".to_string(),
        proxy.server.clone(),
        proxy.port.to_string(),
        ss.cipher.clone(),
        quoted(&ss.password),
    ];
    match ss.plugin.as_deref() {
        Some("obfs-local" | "simple-obfs") => {
            let opts = split_plugin_opts(ss.plugin_opts.as_deref().unwrap_or_default());
            for (key, value) in opts {
                match key.as_str() {
                    "obfs" => params.push(format!("obfs-name={}", value)),
                    "obfs-host" => params.push(format!("obfs-host={}", value)),
                    "obfs-uri" => params.push(format!("obfs-uri={}", value)),
                    _ => {}
                }
            }
        }
        Some(other) => debug!("Loon has no {} plugin, writing {} without it", other, proxy.name),
        None => {}
    }
    params.push("fast-open=false".to_string());
    params.push(format!("udp={}", ss.udp));
    params
}

fn shadowsocks_r_line(proxy: &Proxy, ssr: &ShadowsocksRSettings) -> Vec<String> {
    vec![
        "ShadowsocksR".to_string(),
        proxy.server.clone(),
        proxy.port.to_string(),
        ssr_wire_cipher(&ssr.cipher).to_string(),
        quoted(&ssr.password),
        format!("protocol={}", ssr.protocol),
        format!("protocol-param={}", ssr.protocol_param),
        format!("obfs={}", ssr.obfs),
        format!("obfs-param={}", ssr.obfs_param),
        "fast-open=false".to_string(),
        "udp=false".to_string(),
    ]
}

fn vmess_line(proxy: &Proxy, vmess: &VMessSettings) -> Vec<String> {
    let mut params = vec![
        "vmess".to_string(),
        proxy.server.clone(),
        proxy.port.to_string(),
        vmess.cipher.clone(),
        quoted(&vmess.uuid),
        format!("transport={}", vmess.network),
        format!("alterId={}", vmess.alter_id),
    ];
    ws_params(&mut params, vmess.ws_opts.as_ref());
    params.push(format!("over-tls={}", vmess.tls));
    if let Some(sni) = &vmess.servername {
        params.push(format!("tls-name={}", sni));
    }
    params.push(format!("skip-cert-verify={}", vmess.skip_cert_verify));
    params
}

fn trojan_line(proxy: &Proxy, trojan: &TrojanSettings) -> Vec<String> {
    let mut params = vec![
        "trojan".to_string(),
        proxy.server.clone(),
        proxy.port.to_string(),
        quoted(&trojan.password),
    ];
    if trojan.network == "ws" {
        params.push("transport=ws".to_string());
        ws_params(&mut params, trojan.ws_opts.as_ref());
    }
    if let Some(sni) = &trojan.sni {
        params.push(format!("tls-name={}", sni));
    }
    params.push(format!("skip-cert-verify={}", trojan.skip_cert_verify));
    params.push(format!("udp={}", trojan.udp));
    params
}

fn loon_params(proxy: &Proxy) -> Option<Vec<String>> {
    match proxy.settings() {
        ProxySettings::Shadowsocks(ss) => Some(shadowsocks_line(proxy, ss)),
        ProxySettings::ShadowsocksR(ssr) => Some(shadowsocks_r_line(proxy, ssr)),
        ProxySettings::VMess(vmess) => Some(vmess_line(proxy, vmess)),
        ProxySettings::Trojan(trojan) => Some(trojan_line(proxy, trojan)),
        _ => None,
    }
}

/// Renders one `[Proxy]` line, `None` for protocols Loon cannot express.
pub fn proxy_to_loon(proxy: &Proxy) -> Option<String> {
    let params = loon_params(proxy)?;
    Some(format!("{} = {}", loon_name(&proxy.name), params.join(",")))
}

impl ProxyGenerator for LoonGenerator {
    fn format(&self) -> Format {
        Format::Loon
    }

    fn supported_protocols(&self) -> &'static [ProxyType] {
        &LOON_PROTOCOLS
    }

    fn generate(&self, proxies: &[Proxy]) -> Result<String> {
        let mut renamed = Vec::with_capacity(proxies.len());
        let mut params = Vec::with_capacity(proxies.len());
        for proxy in proxies {
            match loon_params(proxy) {
                Some(line) => {
                    let mut proxy = proxy.clone();
                    proxy.name = loon_name(&proxy.name);
                    renamed.push(ParsedProxy::named(proxy));
                    params.push(line);
                }
                None => warn!("No Loon form for {} proxy {}", proxy.proxy_type(), proxy.name),
            }
        }

        // Sanitised names may collide
        let names: Vec<String> = dedupe_names(renamed).into_iter().map(|proxy| proxy.name).collect();
        let lines: Vec<String> = names
            .iter()
            .zip(&params)
            .map(|(name, params)| format!("{} = {}", name, params.join(",")))
            .collect();

        let mut sections: LinkedHashMap<&str, Vec<String>> = LinkedHashMap::new();
        sections.insert("Proxy", lines);
        sections.insert("Proxy Group", loon_groups(&names, &self.settings));
        sections.insert("Rule", loon_rules());

        let mut output = String::from(LOON_GENERAL);
        for (section, body) in sections.iter() {
            output.push('\n');
            output.push_str(&format!("[{}]\n", section));
            for line in body {
                output.push_str(line);
                output.push('\n');
            }
        }
        output.push('\n');
        output.push_str(LOON_TRAILER);
        Ok(output)
    }
}
