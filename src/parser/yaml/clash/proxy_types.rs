//! Mapping from a Clash proxy entry to a [`Proxy`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{
    GrpcOptions, Hysteria2Settings, HysteriaSettings, HttpSettings, ParsedProxy, Proxy,
    ProxySettings, ProxyType, RealityOptions, ShadowsocksRSettings, ShadowsocksSettings,
    Socks5Settings, TrojanSettings, VMessSettings, VlessSettings, WsOptions, DEFAULT_DOWN_MBPS,
    DEFAULT_UP_MBPS,
};
use crate::parser::explodes::hysteria::parse_mbps;
use crate::parser::explodes::ssr::{SSR_AUTO_CIPHER, SSR_DUMMY_CIPHER};
use crate::utils::json::{
    json_bool, json_object, json_port, json_str, json_str_any, json_string_list, json_u64,
    value_as_string,
};
use crate::utils::plugin::plugin_from_clash;

type Entry = Map<String, Value>;

/// Why a Clash proxy entry was not turned into a proxy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClashEntryError {
    #[error("proxy entry has no type")]
    MissingType,
    #[error("unsupported proxy type {0}")]
    Unsupported(String),
    #[error("invalid {kind} proxy: missing {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}

/// Builds a proxy from one entry of the `proxies:` list.
pub fn proxy_from_clash_map(entry: &Entry) -> Result<ParsedProxy, ClashEntryError> {
    let tag = json_str(entry, "type").ok_or(ClashEntryError::MissingType)?;
    let proxy_type = ProxyType::from_tag(&tag)
        .ok_or_else(|| ClashEntryError::Unsupported(tag.to_ascii_lowercase()))?;
    let kind = proxy_type.as_str();

    let server = json_str(entry, "server").ok_or(ClashEntryError::MissingField {
        kind,
        field: "server",
    })?;
    let port = json_port(entry, "port").ok_or(ClashEntryError::MissingField {
        kind,
        field: "port",
    })?;

    let settings = match proxy_type {
        ProxyType::Shadowsocks => shadowsocks(entry, kind)?,
        ProxyType::ShadowsocksR => shadowsocks_r(entry, kind)?,
        ProxyType::VMess => vmess(entry, kind)?,
        ProxyType::Vless => vless(entry, kind)?,
        ProxyType::Trojan => trojan(entry, kind)?,
        ProxyType::Hysteria => hysteria(entry),
        ProxyType::Hysteria2 => hysteria2(entry),
        ProxyType::Http => ProxySettings::Http(HttpSettings {
            username: json_str(entry, "username"),
            password: json_str(entry, "password"),
            tls: flag(entry, "tls"),
            skip_cert_verify: flag(entry, "skip-cert-verify"),
        }),
        ProxyType::Socks5 => ProxySettings::Socks5(Socks5Settings {
            username: json_str(entry, "username"),
            password: json_str(entry, "password"),
            udp: flag(entry, "udp"),
        }),
    };

    Ok(ParsedProxy::new(
        Proxy::new(String::new(), server, port, settings),
        json_str(entry, "name"),
    ))
}

fn flag(entry: &Entry, key: &str) -> bool {
    json_bool(entry, key).unwrap_or(false)
}

fn required(entry: &Entry, kind: &'static str, field: &'static str) -> Result<String, ClashEntryError> {
    json_str(entry, field).ok_or(ClashEntryError::MissingField { kind, field })
}

fn network(entry: &Entry) -> String {
    json_str(entry, "network")
        .map(|n| n.to_ascii_lowercase())
        .unwrap_or_else(|| "tcp".to_string())
}

/// Reads `ws-opts`, falling back to the legacy `ws-path` / `ws-headers` keys.
fn ws_opts(entry: &Entry) -> WsOptions {
    let opts = json_object(entry, "ws-opts");
    let path = opts
        .and_then(|o| json_str(o, "path"))
        .or_else(|| json_str(entry, "ws-path"))
        .unwrap_or_else(|| "/".to_string());
    let headers = opts
        .and_then(|o| json_object(o, "headers"))
        .or_else(|| json_object(entry, "ws-headers"));
    let host = headers.and_then(|h| json_str_any(h, &["Host", "host"]));
    WsOptions { path, host }
}

fn grpc_opts(entry: &Entry) -> GrpcOptions {
    let service_name = json_object(entry, "grpc-opts")
        .and_then(|o| json_str(o, "grpc-service-name"))
        .unwrap_or_default();
    GrpcOptions { service_name }
}

fn transport(entry: &Entry, network: &str) -> (Option<WsOptions>, Option<GrpcOptions>) {
    match network {
        "ws" => (Some(ws_opts(entry)), None),
        "grpc" => (None, Some(grpc_opts(entry))),
        _ => (None, None),
    }
}

fn shadowsocks(entry: &Entry, kind: &'static str) -> Result<ProxySettings, ClashEntryError> {
    let (plugin, plugin_opts) = match json_str(entry, "plugin") {
        Some(name) => {
            let (name, opts) = plugin_from_clash(&name, json_object(entry, "plugin-opts"));
            (Some(name), opts)
        }
        None => (None, None),
    };

    Ok(ProxySettings::Shadowsocks(ShadowsocksSettings {
        cipher: required(entry, kind, "cipher")?,
        password: required(entry, kind, "password")?,
        udp: flag(entry, "udp"),
        plugin,
        plugin_opts,
    }))
}

fn shadowsocks_r(entry: &Entry, kind: &'static str) -> Result<ProxySettings, ClashEntryError> {
    let mut cipher = required(entry, kind, "cipher")?;
    if cipher == SSR_DUMMY_CIPHER {
        cipher = SSR_AUTO_CIPHER.to_string();
    }

    Ok(ProxySettings::ShadowsocksR(ShadowsocksRSettings {
        cipher,
        password: required(entry, kind, "password")?,
        protocol: required(entry, kind, "protocol")?,
        protocol_param: json_str_any(entry, &["protocol-param", "protocolparam"]).unwrap_or_default(),
        obfs: required(entry, kind, "obfs")?,
        obfs_param: json_str_any(entry, &["obfs-param", "obfsparam"]).unwrap_or_default(),
        group: json_str(entry, "group"),
    }))
}

fn vmess(entry: &Entry, kind: &'static str) -> Result<ProxySettings, ClashEntryError> {
    let network = network(entry);
    let (ws_opts, grpc_opts) = transport(entry, &network);

    Ok(ProxySettings::VMess(VMessSettings {
        uuid: required(entry, kind, "uuid")?,
        alter_id: json_u64(entry, "alterId")
            .and_then(|aid| u32::try_from(aid).ok())
            .unwrap_or(0),
        cipher: json_str(entry, "cipher").unwrap_or_else(|| "auto".to_string()),
        network,
        tls: flag(entry, "tls"),
        skip_cert_verify: flag(entry, "skip-cert-verify"),
        servername: json_str(entry, "servername"),
        ws_opts,
        grpc_opts,
    }))
}

fn vless(entry: &Entry, kind: &'static str) -> Result<ProxySettings, ClashEntryError> {
    let network = network(entry);
    let (ws_opts, grpc_opts) = transport(entry, &network);
    let reality_opts = json_object(entry, "reality-opts").and_then(|opts| {
        Some(RealityOptions {
            public_key: json_str(opts, "public-key")?,
            short_id: json_str(opts, "short-id"),
        })
    });

    Ok(ProxySettings::Vless(VlessSettings {
        uuid: required(entry, kind, "uuid")?,
        network,
        tls: flag(entry, "tls") || reality_opts.is_some(),
        servername: json_str(entry, "servername"),
        flow: json_str(entry, "flow"),
        skip_cert_verify: flag(entry, "skip-cert-verify"),
        reality_opts,
        client_fingerprint: json_str(entry, "client-fingerprint"),
        ws_opts,
        grpc_opts,
    }))
}

fn trojan(entry: &Entry, kind: &'static str) -> Result<ProxySettings, ClashEntryError> {
    let network = network(entry);
    let (ws_opts, grpc_opts) = transport(entry, &network);

    Ok(ProxySettings::Trojan(TrojanSettings {
        password: required(entry, kind, "password")?,
        udp: flag(entry, "udp"),
        skip_cert_verify: flag(entry, "skip-cert-verify"),
        sni: json_str(entry, "sni"),
        network,
        ws_opts,
        grpc_opts,
    }))
}

fn bandwidth(entry: &Entry, key: &str, default: u32) -> u32 {
    entry
        .get(key)
        .and_then(value_as_string)
        .and_then(|v| parse_mbps(&v))
        .unwrap_or(default)
}

fn hysteria(entry: &Entry) -> ProxySettings {
    ProxySettings::Hysteria(HysteriaSettings {
        auth: json_str_any(entry, &["auth-str", "auth_str", "auth"]),
        protocol: json_str(entry, "protocol").unwrap_or_else(|| "udp".to_string()),
        skip_cert_verify: flag(entry, "skip-cert-verify"),
        sni: json_str(entry, "sni"),
        up: bandwidth(entry, "up", DEFAULT_UP_MBPS),
        down: bandwidth(entry, "down", DEFAULT_DOWN_MBPS),
        alpn: json_string_list(entry, "alpn"),
        obfs: json_str(entry, "obfs"),
    })
}

fn hysteria2(entry: &Entry) -> ProxySettings {
    ProxySettings::Hysteria2(Hysteria2Settings {
        password: json_str_any(entry, &["password", "auth"]).unwrap_or_default(),
        skip_cert_verify: flag(entry, "skip-cert-verify"),
        sni: json_str(entry, "sni"),
        obfs: json_str(entry, "obfs"),
        obfs_password: json_str(entry, "obfs-password"),
    })
}
