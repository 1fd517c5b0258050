use serde_json::{json, Map, Value};

use super::common::{
    authority, clash_entry, clash_transport, flag, fragment, insert_opt, link_transport,
    singbox_outbound, singbox_tls, singbox_transport,
};
use super::ProxyAdapter;
use crate::models::{Proxy, ProxySettings, ProxyType};
use crate::utils::url::{build_query, url_encode};

pub struct TrojanAdapter;

impl ProxyAdapter for TrojanAdapter {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::Trojan
    }

    fn to_link(&self, proxy: &Proxy) -> Option<String> {
        let ProxySettings::Trojan(trojan) = proxy.settings() else {
            return None;
        };

        let mut pairs: Vec<(&'static str, String)> = vec![
            ("sni", trojan.sni.clone().unwrap_or_default()),
            ("type", trojan.network.clone()),
        ];
        if trojan.skip_cert_verify {
            pairs.push(("allowInsecure", flag(true)));
        }
        link_transport(&mut pairs, trojan.ws_opts.as_ref(), trojan.grpc_opts.as_ref());

        Some(format!(
            "trojan://{}@{}?{}{}",
            url_encode(&trojan.password),
            authority(proxy),
            build_query(&pairs),
            fragment(proxy)
        ))
    }

    fn to_clash(&self, proxy: &Proxy) -> Option<Map<String, Value>> {
        let ProxySettings::Trojan(trojan) = proxy.settings() else {
            return None;
        };

        let mut map = clash_entry(proxy);
        map.insert("password".to_string(), json!(trojan.password));
        map.insert("udp".to_string(), json!(trojan.udp));
        map.insert("skip-cert-verify".to_string(), json!(trojan.skip_cert_verify));
        insert_opt(&mut map, "sni", trojan.sni.as_deref());
        clash_transport(
            &mut map,
            &trojan.network,
            trojan.ws_opts.as_ref(),
            trojan.grpc_opts.as_ref(),
        );
        Some(map)
    }

    fn to_singbox(&self, proxy: &Proxy) -> Option<Value> {
        let ProxySettings::Trojan(trojan) = proxy.settings() else {
            return None;
        };

        let mut outbound = singbox_outbound("trojan", proxy);
        outbound.insert("password".to_string(), json!(trojan.password));
        let tls = singbox_tls(true, trojan.sni.as_deref(), trojan.skip_cert_verify);
        outbound.insert("tls".to_string(), Value::Object(tls));
        if let Some(transport) =
            singbox_transport(trojan.ws_opts.as_ref(), trojan.grpc_opts.as_ref())
        {
            outbound.insert("transport".to_string(), transport);
        }
        if !trojan.udp {
            outbound.insert("network".to_string(), json!("tcp"));
        }
        Some(Value::Object(outbound))
    }
}
