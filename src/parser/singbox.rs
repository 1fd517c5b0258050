//! Reader for the `outbounds` of a sing-box configuration.

use log::{debug, info, warn};
use serde_json::{Map, Value};

use crate::error::{ConvertError, Result};
use crate::models::{
    GrpcOptions, Hysteria2Settings, HysteriaSettings, HttpSettings, ParseOutcome, ParsedProxy,
    Proxy, ProxySettings, RealityOptions, ShadowsocksRSettings, ShadowsocksSettings,
    Socks5Settings, TrojanSettings, VMessSettings, VlessSettings, WsOptions, DEFAULT_DOWN_MBPS,
    DEFAULT_UP_MBPS,
};
use crate::parser::types::ParsedBatch;
use crate::utils::json::{
    json_bool, json_object, json_port, json_str, json_str_any, json_string_list, json_u64,
    parse_json_tolerant,
};

type Outbound = Map<String, Value>;

/// Outbound types that route traffic but are not proxies.
const NON_PROXY_TYPES: [&str; 5] = ["selector", "urltest", "direct", "block", "dns"];

const PROXY_TYPES: [&str; 9] = [
    "shadowsocks",
    "shadowsocksr",
    "vmess",
    "vless",
    "trojan",
    "hysteria",
    "hysteria2",
    "http",
    "socks",
];

enum Entry {
    Proxy(ParsedProxy),
    Skipped,
    Unsupported(String),
}

/// Parse the outbounds of a sing-box configuration
///
/// `outbounds` may be an array or a single object; a bare array of outbounds
/// is accepted too. Group and routing outbounds are skipped, unknown types
/// are reported in `unsupported`, and entries missing required fields are
/// dropped with a warning.
pub fn parse_singbox_json(content: &str) -> ParseOutcome {
    let Some(document) = parse_json_tolerant(content) else {
        warn!("Input is not valid sing-box JSON");
        return ParseOutcome::default();
    };

    let outbounds: Vec<Value> = match document {
        Value::Array(items) => items,
        Value::Object(mut root) => match root.remove("outbounds") {
            Some(Value::Array(items)) => items,
            Some(single @ Value::Object(_)) => vec![single],
            _ => {
                warn!("sing-box config has no outbounds");
                Vec::new()
            }
        },
        _ => Vec::new(),
    };

    let mut batch = ParsedBatch::new();
    for outbound in outbounds {
        let Value::Object(outbound) = outbound else {
            continue;
        };
        match read_outbound(&outbound) {
            Ok(Entry::Proxy(parsed)) => batch.push(parsed),
            Ok(Entry::Skipped) => {}
            Ok(Entry::Unsupported(kind)) => {
                debug!("Unsupported outbound type {}", kind);
                batch.push_unsupported(kind);
            }
            Err(err) => warn!("Skipping outbound: {}", err),
        }
    }

    info!(
        "Parsed {} proxies from sing-box config ({} unsupported types)",
        batch.len(),
        batch.unsupported().len()
    );
    batch.finish()
}

fn read_outbound(outbound: &Outbound) -> Result<Entry> {
    let Some(kind) = json_str(outbound, "type").map(|t| t.to_ascii_lowercase()) else {
        return Err(ConvertError::Validation("outbound has no type".to_string()));
    };
    if NON_PROXY_TYPES.contains(&kind.as_str()) {
        return Ok(Entry::Skipped);
    }
    if !PROXY_TYPES.contains(&kind.as_str()) {
        return Ok(Entry::Unsupported(kind));
    }

    let tag = json_str(outbound, "tag");
    let server = json_str(outbound, "server")
        .ok_or_else(|| invalid(&kind, tag.as_deref(), "server"))?;
    let port = json_port(outbound, "server_port")
        .ok_or_else(|| invalid(&kind, tag.as_deref(), "server_port"))?;

    let settings = match kind.as_str() {
        "shadowsocks" => ProxySettings::Shadowsocks(ShadowsocksSettings {
            cipher: require(outbound, &kind, "method")?,
            password: require(outbound, &kind, "password")?,
            udp: udp_enabled(outbound),
            plugin: json_str(outbound, "plugin"),
            plugin_opts: json_str(outbound, "plugin_opts"),
        }),
        "shadowsocksr" => ProxySettings::ShadowsocksR(ShadowsocksRSettings {
            cipher: require(outbound, &kind, "method")?,
            password: require(outbound, &kind, "password")?,
            protocol: json_str(outbound, "protocol").unwrap_or_else(|| "origin".to_string()),
            protocol_param: json_str(outbound, "protocol_param").unwrap_or_default(),
            obfs: json_str(outbound, "obfs").unwrap_or_else(|| "plain".to_string()),
            obfs_param: json_str(outbound, "obfs_param").unwrap_or_default(),
            group: None,
        }),
        "vmess" => {
            let tls = Tls::read(outbound);
            let (network, ws_opts, grpc_opts) = transport(outbound);
            ProxySettings::VMess(VMessSettings {
                uuid: require(outbound, &kind, "uuid")?,
                alter_id: json_u64(outbound, "alter_id")
                    .and_then(|aid| u32::try_from(aid).ok())
                    .unwrap_or(0),
                cipher: json_str(outbound, "security").unwrap_or_else(|| "auto".to_string()),
                network,
                tls: tls.enabled,
                skip_cert_verify: tls.insecure,
                servername: tls.server_name,
                ws_opts,
                grpc_opts,
            })
        }
        "vless" => {
            let tls = Tls::read(outbound);
            let (network, ws_opts, grpc_opts) = transport(outbound);
            ProxySettings::Vless(VlessSettings {
                uuid: require(outbound, &kind, "uuid")?,
                network,
                tls: tls.enabled,
                servername: tls.server_name,
                flow: json_str(outbound, "flow"),
                skip_cert_verify: tls.insecure,
                reality_opts: tls.reality,
                client_fingerprint: tls.fingerprint,
                ws_opts,
                grpc_opts,
            })
        }
        "trojan" => {
            let tls = Tls::read(outbound);
            let (network, ws_opts, grpc_opts) = transport(outbound);
            ProxySettings::Trojan(TrojanSettings {
                password: require(outbound, &kind, "password")?,
                udp: udp_enabled(outbound),
                skip_cert_verify: tls.insecure,
                sni: tls.server_name,
                network,
                ws_opts,
                grpc_opts,
            })
        }
        "hysteria" => {
            let tls = Tls::read(outbound);
            ProxySettings::Hysteria(HysteriaSettings {
                auth: json_str_any(outbound, &["auth_str", "auth"]),
                skip_cert_verify: tls.insecure,
                sni: tls.server_name,
                up: mbps(outbound, "up_mbps", DEFAULT_UP_MBPS),
                down: mbps(outbound, "down_mbps", DEFAULT_DOWN_MBPS),
                alpn: tls.alpn,
                obfs: json_str(outbound, "obfs"),
                ..Default::default()
            })
        }
        "hysteria2" => {
            let tls = Tls::read(outbound);
            let obfs = json_object(outbound, "obfs");
            ProxySettings::Hysteria2(Hysteria2Settings {
                password: json_str(outbound, "password").unwrap_or_default(),
                skip_cert_verify: tls.insecure,
                sni: tls.server_name,
                obfs: obfs.and_then(|o| json_str(o, "type")),
                obfs_password: obfs.and_then(|o| json_str(o, "password")),
            })
        }
        "http" => {
            let tls = Tls::read(outbound);
            ProxySettings::Http(HttpSettings {
                username: json_str(outbound, "username"),
                password: json_str(outbound, "password"),
                tls: tls.enabled,
                skip_cert_verify: tls.insecure,
            })
        }
        "socks" => ProxySettings::Socks5(Socks5Settings {
            username: json_str(outbound, "username"),
            password: json_str(outbound, "password"),
            udp: udp_enabled(outbound),
        }),
        _ => return Ok(Entry::Unsupported(kind)),
    };

    Ok(Entry::Proxy(ParsedProxy::new(
        Proxy::new(String::new(), server, port, settings),
        tag,
    )))
}

fn invalid(kind: &str, tag: Option<&str>, field: &str) -> ConvertError {
    ConvertError::Validation(format!(
        "{} outbound {} is missing {}",
        kind,
        tag.unwrap_or("<untagged>"),
        field
    ))
}

fn require(outbound: &Outbound, kind: &str, field: &str) -> Result<String> {
    json_str(outbound, field)
        .ok_or_else(|| invalid(kind, json_str(outbound, "tag").as_deref(), field))
}

/// sing-box enables both TCP and UDP unless `network` pins one of them.
fn udp_enabled(outbound: &Outbound) -> bool {
    json_str(outbound, "network").map_or(true, |network| network != "tcp")
}

fn mbps(outbound: &Outbound, key: &str, default: u32) -> u32 {
    json_u64(outbound, key)
        .filter(|mbps| *mbps > 0)
        .and_then(|mbps| u32::try_from(mbps).ok())
        .unwrap_or(default)
}

/// The nested `tls` object shared by most outbound types.
#[derive(Default)]
struct Tls {
    enabled: bool,
    insecure: bool,
    server_name: Option<String>,
    alpn: Vec<String>,
    fingerprint: Option<String>,
    reality: Option<RealityOptions>,
}

impl Tls {
    fn read(outbound: &Outbound) -> Self {
        let Some(tls) = json_object(outbound, "tls") else {
            return Tls::default();
        };

        let fingerprint = json_object(tls, "utls")
            .filter(|utls| json_bool(utls, "enabled").unwrap_or(false))
            .and_then(|utls| json_str(utls, "fingerprint"));
        let reality = json_object(tls, "reality")
            .filter(|reality| json_bool(reality, "enabled").unwrap_or(false))
            .and_then(|reality| {
                Some(RealityOptions {
                    public_key: json_str(reality, "public_key")?,
                    short_id: json_str(reality, "short_id"),
                })
            });

        Tls {
            enabled: json_bool(tls, "enabled").unwrap_or(false),
            insecure: json_bool(tls, "insecure").unwrap_or(false),
            server_name: json_str(tls, "server_name"),
            alpn: json_string_list(tls, "alpn"),
            fingerprint,
            reality,
        }
    }
}

fn transport(outbound: &Outbound) -> (String, Option<WsOptions>, Option<GrpcOptions>) {
    let Some(transport) = json_object(outbound, "transport") else {
        return ("tcp".to_string(), None, None);
    };
    match json_str(transport, "type").as_deref() {
        Some("ws") => {
            let host = json_object(transport, "headers")
                .and_then(|headers| json_str_any(headers, &["Host", "host"]));
            let ws = WsOptions {
                path: json_str(transport, "path").unwrap_or_else(|| "/".to_string()),
                host,
            };
            ("ws".to_string(), Some(ws), None)
        }
        Some("grpc") => {
            let grpc = GrpcOptions {
                service_name: json_str(transport, "service_name").unwrap_or_default(),
            };
            ("grpc".to_string(), None, Some(grpc))
        }
        Some(other) => (other.to_string(), None, None),
        None => ("tcp".to_string(), None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyType;

    const CONFIG: &str = r#"{
        "log": {"level": "info"},
        "outbounds": [
            {"type": "selector", "tag": "proxy", "outbounds": ["a"]},
            {"type": "shadowsocks", "tag": "a", "server": "1.2.3.4", "server_port": 8388,
             "method": "aes-128-gcm", "password": "pw", "network": "tcp"},
            {"type": "vless", "tag": "b", "server": "v.com", "server_port": 443,
             "uuid": "id", "flow": "xtls-rprx-vision",
             "tls": {"enabled": true, "server_name": "www.apple.com",
                     "utls": {"enabled": true, "fingerprint": "chrome"},
                     "reality": {"enabled": true, "public_key": "pk", "short_id": "ab"}}},
            {"type": "vmess", "tag": "c", "server": "m.com", "server_port": 80, "uuid": "id",
             "transport": {"type": "ws", "path": "/ray", "headers": {"Host": "cdn.com"}}},
            {"type": "tuic", "tag": "d", "server": "t.com", "server_port": 443},
            {"type": "trojan", "tag": "e", "server_port": 443, "password": "x"},
            {"type": "direct", "tag": "direct"},
        ]
    }"#;

    #[test]
    fn test_parse_outbounds() {
        let outcome = parse_singbox_json(CONFIG);
        assert_eq!(outcome.unsupported, vec!["tuic"]);
        assert_eq!(outcome.proxies.len(), 3);

        let ProxySettings::Shadowsocks(ss) = outcome.proxies[0].settings() else {
            panic!("expected shadowsocks");
        };
        assert!(!ss.udp);

        let ProxySettings::Vless(vless) = outcome.proxies[1].settings() else {
            panic!("expected vless");
        };
        assert!(vless.tls);
        assert_eq!(vless.client_fingerprint.as_deref(), Some("chrome"));
        assert_eq!(vless.reality_opts.as_ref().unwrap().short_id.as_deref(), Some("ab"));

        let ProxySettings::VMess(vmess) = outcome.proxies[2].settings() else {
            panic!("expected vmess");
        };
        assert_eq!(vmess.network, "ws");
        assert_eq!(vmess.ws_opts.as_ref().unwrap().host.as_deref(), Some("cdn.com"));
    }

    #[test]
    fn test_single_outbound_object() {
        let outcome = parse_singbox_json(
            r#"{"outbounds": {"type": "socks", "server": "s.com", "server_port": 1080}}"#,
        );
        assert_eq!(outcome.proxies.len(), 1);
        assert_eq!(outcome.proxies[0].proxy_type(), ProxyType::Socks5);
        assert_eq!(outcome.proxies[0].name, "defaultName_1");
    }

    #[test]
    fn test_zero_port_is_discarded() {
        let outcome = parse_singbox_json(
            r#"{"outbounds": [{"type": "http", "server": "h.com", "server_port": 0}]}"#,
        );
        assert!(outcome.proxies.is_empty());
        assert!(outcome.unsupported.is_empty());
    }

    #[test]
    fn test_not_json() {
        assert_eq!(parse_singbox_json("proxies: []"), ParseOutcome::default());
    }
}
