use serde_json::{json, Map, Value};

use super::common::{authority, clash_entry, flag, fragment, insert_opt, singbox_outbound, singbox_tls};
use super::ProxyAdapter;
use crate::models::{Proxy, ProxySettings, ProxyType};
use crate::utils::url::{build_query, url_encode};

pub struct HysteriaAdapter;

impl ProxyAdapter for HysteriaAdapter {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::Hysteria
    }

    fn to_link(&self, proxy: &Proxy) -> Option<String> {
        let ProxySettings::Hysteria(hy) = proxy.settings() else {
            return None;
        };

        let mut pairs: Vec<(&'static str, String)> = vec![
            ("protocol", hy.protocol.clone()),
            ("auth", hy.auth.clone().unwrap_or_default()),
            ("peer", hy.sni.clone().unwrap_or_default()),
            ("upmbps", hy.up.to_string()),
            ("downmbps", hy.down.to_string()),
            ("alpn", hy.alpn.join(",")),
            ("obfs", hy.obfs.clone().unwrap_or_default()),
        ];
        if hy.skip_cert_verify {
            pairs.push(("insecure", flag(true)));
        }

        Some(format!(
            "hysteria://{}?{}{}",
            authority(proxy),
            build_query(&pairs),
            fragment(proxy)
        ))
    }

    fn to_clash(&self, proxy: &Proxy) -> Option<Map<String, Value>> {
        let ProxySettings::Hysteria(hy) = proxy.settings() else {
            return None;
        };

        let mut map = clash_entry(proxy);
        insert_opt(&mut map, "auth-str", hy.auth.as_deref());
        map.insert("protocol".to_string(), json!(hy.protocol));
        map.insert("up".to_string(), json!(format!("{} Mbps", hy.up)));
        map.insert("down".to_string(), json!(format!("{} Mbps", hy.down)));
        map.insert("skip-cert-verify".to_string(), json!(hy.skip_cert_verify));
        insert_opt(&mut map, "sni", hy.sni.as_deref());
        if !hy.alpn.is_empty() {
            map.insert("alpn".to_string(), json!(hy.alpn));
        }
        insert_opt(&mut map, "obfs", hy.obfs.as_deref());
        Some(map)
    }

    /// The transport `protocol` has no sing-box counterpart and is left out.
    fn to_singbox(&self, proxy: &Proxy) -> Option<Value> {
        let ProxySettings::Hysteria(hy) = proxy.settings() else {
            return None;
        };

        let mut outbound = singbox_outbound("hysteria", proxy);
        outbound.insert("up_mbps".to_string(), json!(hy.up));
        outbound.insert("down_mbps".to_string(), json!(hy.down));
        insert_opt(&mut outbound, "auth_str", hy.auth.as_deref());
        insert_opt(&mut outbound, "obfs", hy.obfs.as_deref());
        let mut tls = singbox_tls(true, hy.sni.as_deref(), hy.skip_cert_verify);
        if !hy.alpn.is_empty() {
            tls.insert("alpn".to_string(), json!(hy.alpn));
        }
        outbound.insert("tls".to_string(), Value::Object(tls));
        Some(Value::Object(outbound))
    }
}

pub struct Hysteria2Adapter;

impl ProxyAdapter for Hysteria2Adapter {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::Hysteria2
    }

    fn to_link(&self, proxy: &Proxy) -> Option<String> {
        let ProxySettings::Hysteria2(hy2) = proxy.settings() else {
            return None;
        };

        let mut pairs: Vec<(&'static str, String)> = vec![
            ("sni", hy2.sni.clone().unwrap_or_default()),
            ("obfs", hy2.obfs.clone().unwrap_or_default()),
            ("obfs-password", hy2.obfs_password.clone().unwrap_or_default()),
        ];
        if hy2.skip_cert_verify {
            pairs.push(("insecure", flag(true)));
        }

        let mut link = String::from("hysteria2://");
        if !hy2.password.is_empty() {
            link.push_str(&url_encode(&hy2.password));
            link.push('@');
        }
        link.push_str(&authority(proxy));
        link.push('/');
        let query = build_query(&pairs);
        if !query.is_empty() {
            link.push('?');
            link.push_str(&query);
        }
        link.push_str(&fragment(proxy));
        Some(link)
    }

    fn to_clash(&self, proxy: &Proxy) -> Option<Map<String, Value>> {
        let ProxySettings::Hysteria2(hy2) = proxy.settings() else {
            return None;
        };

        let mut map = clash_entry(proxy);
        map.insert("password".to_string(), json!(hy2.password));
        map.insert("skip-cert-verify".to_string(), json!(hy2.skip_cert_verify));
        insert_opt(&mut map, "sni", hy2.sni.as_deref());
        insert_opt(&mut map, "obfs", hy2.obfs.as_deref());
        insert_opt(&mut map, "obfs-password", hy2.obfs_password.as_deref());
        Some(map)
    }

    fn to_singbox(&self, proxy: &Proxy) -> Option<Value> {
        let ProxySettings::Hysteria2(hy2) = proxy.settings() else {
            return None;
        };

        let mut outbound = singbox_outbound("hysteria2", proxy);
        outbound.insert("password".to_string(), json!(hy2.password));
        if let Some(obfs) = &hy2.obfs {
            let mut opts = Map::new();
            opts.insert("type".to_string(), json!(obfs));
            insert_opt(&mut opts, "password", hy2.obfs_password.as_deref());
            outbound.insert("obfs".to_string(), Value::Object(opts));
        }
        let tls = singbox_tls(true, hy2.sni.as_deref(), hy2.skip_cert_verify);
        outbound.insert("tls".to_string(), Value::Object(tls));
        Some(Value::Object(outbound))
    }
}
