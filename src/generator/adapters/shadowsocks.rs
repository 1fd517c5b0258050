use serde_json::{json, Map, Value};

use super::common::{authority, clash_entry, fragment, singbox_outbound};
use super::ProxyAdapter;
use crate::models::{Proxy, ProxySettings, ProxyType};
use crate::parser::explodes::ssr::ssr_wire_cipher;
use crate::utils::base64::url_safe_base64_encode;
use crate::utils::plugin::plugin_to_clash;
use crate::utils::url::url_encode;

pub struct ShadowsocksAdapter;

impl ProxyAdapter for ShadowsocksAdapter {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::Shadowsocks
    }

    /// SIP002 layout: `ss://base64url(method:password)@host:port[/?plugin=...]#name`
    fn to_link(&self, proxy: &Proxy) -> Option<String> {
        let ProxySettings::Shadowsocks(ss) = proxy.settings() else {
            return None;
        };

        let userinfo = url_safe_base64_encode(&format!("{}:{}", ss.cipher, ss.password));
        let mut link = format!("ss://{}@{}", userinfo, authority(proxy));
        if let Some(plugin) = &ss.plugin {
            let value = match &ss.plugin_opts {
                Some(opts) => format!("{};{}", plugin, opts),
                None => plugin.clone(),
            };
            link.push_str("/?plugin=");
            link.push_str(&url_encode(&value));
        }
        link.push_str(&fragment(proxy));
        Some(link)
    }

    fn to_clash(&self, proxy: &Proxy) -> Option<Map<String, Value>> {
        let ProxySettings::Shadowsocks(ss) = proxy.settings() else {
            return None;
        };

        let mut map = clash_entry(proxy);
        map.insert("cipher".to_string(), json!(ss.cipher));
        map.insert("password".to_string(), json!(ss.password));
        map.insert("udp".to_string(), json!(ss.udp));
        if let Some(plugin) = &ss.plugin {
            let (name, opts) = plugin_to_clash(plugin, ss.plugin_opts.as_deref());
            map.insert("plugin".to_string(), json!(name));
            if !opts.is_empty() {
                map.insert("plugin-opts".to_string(), Value::Object(opts));
            }
        }
        Some(map)
    }

    fn to_singbox(&self, proxy: &Proxy) -> Option<Value> {
        let ProxySettings::Shadowsocks(ss) = proxy.settings() else {
            return None;
        };

        let mut outbound = singbox_outbound("shadowsocks", proxy);
        outbound.insert("method".to_string(), json!(ss.cipher));
        outbound.insert("password".to_string(), json!(ss.password));
        if let Some(plugin) = &ss.plugin {
            outbound.insert("plugin".to_string(), json!(plugin));
            if let Some(opts) = &ss.plugin_opts {
                outbound.insert("plugin_opts".to_string(), json!(opts));
            }
        }
        if !ss.udp {
            outbound.insert("network".to_string(), json!("tcp"));
        }
        Some(Value::Object(outbound))
    }
}

pub struct ShadowsocksRAdapter;

impl ProxyAdapter for ShadowsocksRAdapter {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::ShadowsocksR
    }

    fn to_link(&self, proxy: &Proxy) -> Option<String> {
        let ProxySettings::ShadowsocksR(ssr) = proxy.settings() else {
            return None;
        };

        let main = format!(
            "{}:{}:{}:{}:{}:{}",
            proxy.server,
            proxy.port,
            ssr.protocol,
            ssr_wire_cipher(&ssr.cipher),
            ssr.obfs,
            url_safe_base64_encode(&ssr.password)
        );

        let params = [
            ("obfsparam", ssr.obfs_param.as_str()),
            ("protoparam", ssr.protocol_param.as_str()),
            ("remarks", proxy.name.as_str()),
            ("group", ssr.group.as_deref().unwrap_or_default()),
        ]
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, url_safe_base64_encode(value)))
        .collect::<Vec<_>>()
        .join("&");

        Some(format!(
            "ssr://{}",
            url_safe_base64_encode(&format!("{}/?{}", main, params))
        ))
    }

    fn to_clash(&self, proxy: &Proxy) -> Option<Map<String, Value>> {
        let ProxySettings::ShadowsocksR(ssr) = proxy.settings() else {
            return None;
        };

        let mut map = clash_entry(proxy);
        map.insert("cipher".to_string(), json!(ssr_wire_cipher(&ssr.cipher)));
        map.insert("password".to_string(), json!(ssr.password));
        map.insert("protocol".to_string(), json!(ssr.protocol));
        map.insert("protocol-param".to_string(), json!(ssr.protocol_param));
        map.insert("obfs".to_string(), json!(ssr.obfs));
        map.insert("obfs-param".to_string(), json!(ssr.obfs_param));
        Some(map)
    }

    fn to_singbox(&self, _proxy: &Proxy) -> Option<Value> {
        None
    }
}
