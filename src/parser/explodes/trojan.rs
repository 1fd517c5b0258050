use super::common::{build, param, split_url, transport_from_query};
use crate::models::{ParsedProxy, ProxySettings, TrojanSettings, WsOptions};
use crate::utils::url::{parse_flag, strip_scheme};

/// Parse a Trojan link into a Proxy object
///
/// Layout: `trojan://password@host:port?sni=...&allowInsecure=1&type=ws#name`.
/// The legacy trojan-go `ws=1&wspath=` parameters are understood as well.
pub fn explode_trojan(trojan: &str) -> Option<ParsedProxy> {
    strip_scheme(trojan, "trojan://")?;
    let parts = split_url(trojan)?;

    let password = parts.username?;
    let port = parts.port?;
    let params = &parts.params;

    let legacy_ws = params.get("ws").map(|v| parse_flag(v)).unwrap_or(false);
    let network = if legacy_ws {
        "ws".to_string()
    } else {
        param(params, &["type"])
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_else(|| "tcp".to_string())
    };

    let (mut ws_opts, grpc_opts) = transport_from_query(&network, params);
    if legacy_ws {
        if let Some(path) = param(params, &["wspath"]) {
            ws_opts = Some(WsOptions {
                path,
                host: ws_opts.and_then(|ws| ws.host),
            });
        }
    }

    let settings = TrojanSettings {
        password,
        skip_cert_verify: param(params, &["allowInsecure", "insecure"])
            .map(|v| parse_flag(&v))
            .unwrap_or(false),
        sni: param(params, &["sni", "peer"]),
        network,
        ws_opts,
        grpc_opts,
        ..Default::default()
    };

    Some(build(
        parts.name,
        parts.server,
        port,
        ProxySettings::Trojan(settings),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(parsed: &ParsedProxy) -> &TrojanSettings {
        match parsed.proxy.settings() {
            ProxySettings::Trojan(trojan) => trojan,
            other => panic!("unexpected settings {:?}", other),
        }
    }

    #[test]
    fn test_basic_link() {
        let parsed =
            explode_trojan("trojan://p%40ss@example.com:443?sni=sni.example.com&allowInsecure=1#JP%2001")
                .unwrap();
        assert_eq!(parsed.proxy.name, "JP 01");
        assert_eq!(parsed.proxy.port, 443);
        let trojan = settings(&parsed);
        assert_eq!(trojan.password, "p@ss");
        assert_eq!(trojan.sni.as_deref(), Some("sni.example.com"));
        assert!(trojan.skip_cert_verify);
        assert!(trojan.udp);
        assert_eq!(trojan.network, "tcp");
    }

    #[test]
    fn test_legacy_ws_parameters() {
        let parsed =
            explode_trojan("trojan://secret@example.com:443?ws=1&wspath=%2Ftrojan").unwrap();
        let trojan = settings(&parsed);
        assert_eq!(trojan.network, "ws");
        assert_eq!(trojan.ws_opts.as_ref().unwrap().path, "/trojan");
    }

    #[test]
    fn test_grpc_link() {
        let parsed =
            explode_trojan("trojan://secret@example.com:443?type=grpc&serviceName=tun").unwrap();
        let trojan = settings(&parsed);
        assert_eq!(trojan.network, "grpc");
        assert_eq!(trojan.grpc_opts.as_ref().unwrap().service_name, "tun");
    }

    #[test]
    fn test_missing_password() {
        assert!(explode_trojan("trojan://example.com:443").is_none());
    }
}
