use super::common::{build, param, split_url, transport_from_query};
use crate::models::{ParsedProxy, ProxySettings, RealityOptions, VlessSettings};
use crate::utils::url::{parse_flag, strip_scheme};

/// Parse a VLESS link into a Proxy object
///
/// Layout: `vless://uuid@host:port?security=tls|reality&type=ws&sni=...#name`
pub fn explode_vless(vless: &str) -> Option<ParsedProxy> {
    strip_scheme(vless, "vless://")?;
    let parts = split_url(vless)?;

    let uuid = parts.username?;
    let port = parts.port?;
    let params = &parts.params;

    let security = param(params, &["security"])
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_else(|| "none".to_string());
    let network = param(params, &["type"])
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_else(|| "tcp".to_string());
    let (ws_opts, grpc_opts) = transport_from_query(&network, params);

    let reality_opts = if security == "reality" {
        Some(RealityOptions {
            public_key: param(params, &["pbk"]).unwrap_or_default(),
            short_id: param(params, &["sid"]),
        })
    } else {
        None
    };

    let settings = VlessSettings {
        uuid,
        tls: security == "tls" || security == "reality",
        servername: param(params, &["sni", "peer"]),
        flow: param(params, &["flow"]),
        skip_cert_verify: param(params, &["allowInsecure", "insecure"])
            .map(|v| parse_flag(&v))
            .unwrap_or(false),
        reality_opts,
        client_fingerprint: param(params, &["fp"]),
        network,
        ws_opts,
        grpc_opts,
    };

    Some(build(
        parts.name,
        parts.server,
        port,
        ProxySettings::Vless(settings),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(parsed: &ParsedProxy) -> &VlessSettings {
        match parsed.proxy.settings() {
            ProxySettings::Vless(vless) => vless,
            other => panic!("unexpected settings {:?}", other),
        }
    }

    #[test]
    fn test_reality_link() {
        let parsed = explode_vless(
            "vless://b831381d-6324-4d53-ad4f-8cda48b30811@1.2.3.4:443?encryption=none&security=reality&sni=www.microsoft.com&fp=chrome&pbk=Z84J2IelR9ch3k8VtlVhhs5ycBUlXA7wHBWcBrjqnAw&sid=6ba85179e30d4fc2&type=tcp&flow=xtls-rprx-vision#Reality%20Node",
        )
        .unwrap();
        assert_eq!(parsed.proxy.name, "Reality Node");
        let vless = settings(&parsed);
        assert!(vless.tls);
        assert_eq!(vless.network, "tcp");
        assert_eq!(vless.flow.as_deref(), Some("xtls-rprx-vision"));
        assert_eq!(vless.client_fingerprint.as_deref(), Some("chrome"));
        assert_eq!(vless.servername.as_deref(), Some("www.microsoft.com"));
        let reality = vless.reality_opts.as_ref().unwrap();
        assert_eq!(
            reality.public_key,
            "Z84J2IelR9ch3k8VtlVhhs5ycBUlXA7wHBWcBrjqnAw"
        );
        assert_eq!(reality.short_id.as_deref(), Some("6ba85179e30d4fc2"));
    }

    #[test]
    fn test_ws_link() {
        let parsed = explode_vless(
            "vless://b831381d-6324-4d53-ad4f-8cda48b30811@example.com:8443?security=tls&type=ws&path=%2Fws%3Fed%3D2048&host=cdn.example.com&allowInsecure=1",
        )
        .unwrap();
        assert_eq!(parsed.proxy.name, "VLESS");
        let vless = settings(&parsed);
        assert!(vless.tls);
        assert!(vless.skip_cert_verify);
        let ws = vless.ws_opts.as_ref().unwrap();
        assert_eq!(ws.path, "/ws?ed=2048");
        assert_eq!(ws.host.as_deref(), Some("cdn.example.com"));
        assert!(vless.reality_opts.is_none());
    }

    #[test]
    fn test_missing_parts() {
        assert!(explode_vless("vless://example.com:443").is_none());
        assert!(explode_vless("vless://uuid@example.com").is_none());
    }
}
