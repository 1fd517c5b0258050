use serde_json::{json, Map, Value};

use super::common::{authority, clash_entry, flag, fragment, insert_opt, singbox_outbound, singbox_tls};
use super::ProxyAdapter;
use crate::models::{Proxy, ProxySettings, ProxyType};
use crate::utils::url::url_encode;

/// `user[:pass]@`, or nothing without a username.
fn userinfo(username: Option<&str>, password: Option<&str>) -> String {
    match (username, password) {
        (Some(user), Some(pass)) => format!("{}:{}@", url_encode(user), url_encode(pass)),
        (Some(user), None) => format!("{}@", url_encode(user)),
        (None, _) => String::new(),
    }
}

pub struct HttpAdapter;

impl ProxyAdapter for HttpAdapter {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::Http
    }

    fn to_link(&self, proxy: &Proxy) -> Option<String> {
        let ProxySettings::Http(http) = proxy.settings() else {
            return None;
        };

        let scheme = if http.tls { "https" } else { "http" };
        let mut link = format!(
            "{}://{}{}/",
            scheme,
            userinfo(http.username.as_deref(), http.password.as_deref()),
            authority(proxy)
        );
        if http.skip_cert_verify {
            link.push_str("?skip-cert-verify=");
            link.push_str(&flag(true));
        }
        link.push_str(&fragment(proxy));
        Some(link)
    }

    fn to_clash(&self, proxy: &Proxy) -> Option<Map<String, Value>> {
        let ProxySettings::Http(http) = proxy.settings() else {
            return None;
        };

        let mut map = clash_entry(proxy);
        insert_opt(&mut map, "username", http.username.as_deref());
        insert_opt(&mut map, "password", http.password.as_deref());
        map.insert("tls".to_string(), json!(http.tls));
        map.insert("skip-cert-verify".to_string(), json!(http.skip_cert_verify));
        Some(map)
    }

    fn to_singbox(&self, proxy: &Proxy) -> Option<Value> {
        let ProxySettings::Http(http) = proxy.settings() else {
            return None;
        };

        let mut outbound = singbox_outbound("http", proxy);
        insert_opt(&mut outbound, "username", http.username.as_deref());
        insert_opt(&mut outbound, "password", http.password.as_deref());
        if http.tls || http.skip_cert_verify {
            let tls = singbox_tls(http.tls, None, http.skip_cert_verify);
            outbound.insert("tls".to_string(), Value::Object(tls));
        }
        Some(Value::Object(outbound))
    }
}

pub struct Socks5Adapter;

impl ProxyAdapter for Socks5Adapter {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::Socks5
    }

    /// `udp` is only written when disabled, matching the parser default.
    fn to_link(&self, proxy: &Proxy) -> Option<String> {
        let ProxySettings::Socks5(socks) = proxy.settings() else {
            return None;
        };

        let mut link = format!(
            "socks5://{}{}",
            userinfo(socks.username.as_deref(), socks.password.as_deref()),
            authority(proxy)
        );
        if !socks.udp {
            link.push_str("?udp=");
            link.push_str(&flag(false));
        }
        link.push_str(&fragment(proxy));
        Some(link)
    }

    fn to_clash(&self, proxy: &Proxy) -> Option<Map<String, Value>> {
        let ProxySettings::Socks5(socks) = proxy.settings() else {
            return None;
        };

        let mut map = clash_entry(proxy);
        insert_opt(&mut map, "username", socks.username.as_deref());
        insert_opt(&mut map, "password", socks.password.as_deref());
        map.insert("udp".to_string(), json!(socks.udp));
        Some(map)
    }

    fn to_singbox(&self, _proxy: &Proxy) -> Option<Value> {
        None
    }
}
