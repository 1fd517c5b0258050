use serde_json::{json, Map, Value};

use super::common::{
    authority, clash_entry, clash_transport, flag, fragment, insert_opt, link_transport,
    singbox_outbound, singbox_tls, singbox_transport,
};
use super::ProxyAdapter;
use crate::models::{Proxy, ProxySettings, ProxyType};
use crate::utils::base64::base64_encode;
use crate::utils::url::{build_query, url_encode};

pub struct VMessAdapter;

impl ProxyAdapter for VMessAdapter {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::VMess
    }

    /// V2RayN layout: `vmess://base64(json)`. `allowInsecure` is always
    /// written so the ws + tls default does not kick in on re-import.
    fn to_link(&self, proxy: &Proxy) -> Option<String> {
        let ProxySettings::VMess(vmess) = proxy.settings() else {
            return None;
        };

        let host = vmess
            .ws_opts
            .as_ref()
            .and_then(|ws| ws.host.clone())
            .unwrap_or_default();
        let path = match (&vmess.ws_opts, &vmess.grpc_opts) {
            (Some(ws), _) => ws.path.clone(),
            (None, Some(grpc)) => grpc.service_name.clone(),
            (None, None) => String::new(),
        };

        let body = json!({
            "v": "2",
            "ps": proxy.name,
            "add": proxy.server,
            "port": proxy.port.to_string(),
            "id": vmess.uuid,
            "aid": vmess.alter_id.to_string(),
            "scy": vmess.cipher,
            "net": vmess.network,
            "type": "none",
            "host": host,
            "path": path,
            "tls": if vmess.tls { "tls" } else { "" },
            "sni": vmess.servername.clone().unwrap_or_default(),
            "allowInsecure": vmess.skip_cert_verify,
        });

        Some(format!("vmess://{}", base64_encode(&body.to_string())))
    }

    fn to_clash(&self, proxy: &Proxy) -> Option<Map<String, Value>> {
        let ProxySettings::VMess(vmess) = proxy.settings() else {
            return None;
        };

        let mut map = clash_entry(proxy);
        map.insert("uuid".to_string(), json!(vmess.uuid));
        map.insert("alterId".to_string(), json!(vmess.alter_id));
        map.insert("cipher".to_string(), json!(vmess.cipher));
        map.insert("tls".to_string(), json!(vmess.tls));
        map.insert("skip-cert-verify".to_string(), json!(vmess.skip_cert_verify));
        insert_opt(&mut map, "servername", vmess.servername.as_deref());
        clash_transport(
            &mut map,
            &vmess.network,
            vmess.ws_opts.as_ref(),
            vmess.grpc_opts.as_ref(),
        );
        Some(map)
    }

    fn to_singbox(&self, proxy: &Proxy) -> Option<Value> {
        let ProxySettings::VMess(vmess) = proxy.settings() else {
            return None;
        };

        let mut outbound = singbox_outbound("vmess", proxy);
        outbound.insert("uuid".to_string(), json!(vmess.uuid));
        outbound.insert("security".to_string(), json!(vmess.cipher));
        outbound.insert("alter_id".to_string(), json!(vmess.alter_id));
        if vmess.tls || vmess.servername.is_some() || vmess.skip_cert_verify {
            let tls = singbox_tls(
                vmess.tls,
                vmess.servername.as_deref(),
                vmess.skip_cert_verify,
            );
            outbound.insert("tls".to_string(), Value::Object(tls));
        }
        if let Some(transport) =
            singbox_transport(vmess.ws_opts.as_ref(), vmess.grpc_opts.as_ref())
        {
            outbound.insert("transport".to_string(), transport);
        }
        Some(Value::Object(outbound))
    }
}

pub struct VlessAdapter;

impl ProxyAdapter for VlessAdapter {
    fn proxy_type(&self) -> ProxyType {
        ProxyType::Vless
    }

    fn to_link(&self, proxy: &Proxy) -> Option<String> {
        let ProxySettings::Vless(vless) = proxy.settings() else {
            return None;
        };

        let security = match (&vless.reality_opts, vless.tls) {
            (Some(_), _) => "reality",
            (None, true) => "tls",
            (None, false) => "none",
        };

        let mut pairs: Vec<(&'static str, String)> = vec![
            ("encryption", "none".to_string()),
            ("security", security.to_string()),
            ("type", vless.network.clone()),
            ("sni", vless.servername.clone().unwrap_or_default()),
            ("flow", vless.flow.clone().unwrap_or_default()),
            ("fp", vless.client_fingerprint.clone().unwrap_or_default()),
        ];
        if let Some(reality) = &vless.reality_opts {
            pairs.push(("pbk", reality.public_key.clone()));
            pairs.push(("sid", reality.short_id.clone().unwrap_or_default()));
        }
        if vless.skip_cert_verify {
            pairs.push(("allowInsecure", flag(true)));
        }
        link_transport(&mut pairs, vless.ws_opts.as_ref(), vless.grpc_opts.as_ref());

        Some(format!(
            "vless://{}@{}?{}{}",
            url_encode(&vless.uuid),
            authority(proxy),
            build_query(&pairs),
            fragment(proxy)
        ))
    }

    fn to_clash(&self, proxy: &Proxy) -> Option<Map<String, Value>> {
        let ProxySettings::Vless(vless) = proxy.settings() else {
            return None;
        };

        let mut map = clash_entry(proxy);
        map.insert("uuid".to_string(), json!(vless.uuid));
        map.insert("tls".to_string(), json!(vless.tls));
        map.insert("skip-cert-verify".to_string(), json!(vless.skip_cert_verify));
        insert_opt(&mut map, "servername", vless.servername.as_deref());
        insert_opt(&mut map, "flow", vless.flow.as_deref());
        insert_opt(
            &mut map,
            "client-fingerprint",
            vless.client_fingerprint.as_deref(),
        );
        if let Some(reality) = &vless.reality_opts {
            let mut opts = Map::new();
            opts.insert("public-key".to_string(), json!(reality.public_key));
            insert_opt(&mut opts, "short-id", reality.short_id.as_deref());
            map.insert("reality-opts".to_string(), Value::Object(opts));
        }
        clash_transport(
            &mut map,
            &vless.network,
            vless.ws_opts.as_ref(),
            vless.grpc_opts.as_ref(),
        );
        Some(map)
    }

    fn to_singbox(&self, proxy: &Proxy) -> Option<Value> {
        let ProxySettings::Vless(vless) = proxy.settings() else {
            return None;
        };

        let mut outbound = singbox_outbound("vless", proxy);
        outbound.insert("uuid".to_string(), json!(vless.uuid));
        insert_opt(&mut outbound, "flow", vless.flow.as_deref());

        let needs_tls = vless.tls
            || vless.servername.is_some()
            || vless.skip_cert_verify
            || vless.client_fingerprint.is_some()
            || vless.reality_opts.is_some();
        if needs_tls {
            let mut tls = singbox_tls(
                vless.tls,
                vless.servername.as_deref(),
                vless.skip_cert_verify,
            );
            if let Some(fingerprint) = &vless.client_fingerprint {
                tls.insert(
                    "utls".to_string(),
                    json!({ "enabled": true, "fingerprint": fingerprint }),
                );
            }
            if let Some(reality) = &vless.reality_opts {
                let mut opts = Map::new();
                opts.insert("enabled".to_string(), json!(true));
                opts.insert("public_key".to_string(), json!(reality.public_key));
                insert_opt(&mut opts, "short_id", reality.short_id.as_deref());
                tls.insert("reality".to_string(), Value::Object(opts));
            }
            outbound.insert("tls".to_string(), Value::Object(tls));
        }
        if let Some(transport) =
            singbox_transport(vless.ws_opts.as_ref(), vless.grpc_opts.as_ref())
        {
            outbound.insert("transport".to_string(), transport);
        }
        Some(Value::Object(outbound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GrpcOptions, RealityOptions, VMessSettings, VlessSettings, WsOptions};
    use crate::parser::explodes::{explode_vless, explode_vmess};

    fn vmess_ws() -> Proxy {
        Proxy::new(
            "JP ws",
            "jp.example.com",
            443,
            ProxySettings::VMess(VMessSettings {
                uuid: "b831381d-6324-4d53-ad4f-8cda48b30811".to_string(),
                alter_id: 0,
                cipher: "auto".to_string(),
                network: "ws".to_string(),
                tls: true,
                skip_cert_verify: false,
                servername: Some("cdn.example.com".to_string()),
                ws_opts: Some(WsOptions {
                    path: "/ray".to_string(),
                    host: Some("cdn.example.com".to_string()),
                }),
                grpc_opts: None,
            }),
        )
    }

    fn vless_reality() -> Proxy {
        Proxy::new(
            "US reality",
            "2001:db8::1",
            443,
            ProxySettings::Vless(VlessSettings {
                uuid: "b831381d-6324-4d53-ad4f-8cda48b30811".to_string(),
                network: "grpc".to_string(),
                tls: true,
                servername: Some("www.apple.com".to_string()),
                flow: Some("xtls-rprx-vision".to_string()),
                skip_cert_verify: false,
                reality_opts: Some(RealityOptions {
                    public_key: "Z84J2IelR9ch3k8VtlVhhs5ycBUlXA7wHBWcBrjqnAw".to_string(),
                    short_id: Some("6ba85179".to_string()),
                }),
                client_fingerprint: Some("chrome".to_string()),
                ws_opts: None,
                grpc_opts: Some(GrpcOptions {
                    service_name: "grpc-svc".to_string(),
                }),
            }),
        )
    }

    #[test]
    fn test_vmess_link_keeps_explicit_verify() {
        let proxy = vmess_ws();
        let link = VMessAdapter.to_link(&proxy).unwrap();
        assert_eq!(explode_vmess(&link).unwrap().proxy, proxy);
    }

    #[test]
    fn test_vmess_clash_entry() {
        let map = VMessAdapter.to_clash(&vmess_ws()).unwrap();
        assert_eq!(map["network"], json!("ws"));
        assert_eq!(
            map["ws-opts"],
            json!({"path": "/ray", "headers": {"Host": "cdn.example.com"}})
        );
    }

    #[test]
    fn test_vless_link_round_trip() {
        let proxy = vless_reality();
        let link = VlessAdapter.to_link(&proxy).unwrap();
        assert!(link.contains("@[2001:db8::1]:443?"));
        assert_eq!(explode_vless(&link).unwrap().proxy, proxy);
    }

    #[test]
    fn test_vless_singbox_outbound() {
        let outbound = VlessAdapter.to_singbox(&vless_reality()).unwrap();
        assert_eq!(outbound["tls"]["utls"]["fingerprint"], json!("chrome"));
        assert_eq!(outbound["tls"]["reality"]["short_id"], json!("6ba85179"));
        assert_eq!(outbound["transport"]["service_name"], json!("grpc-svc"));
    }
}
