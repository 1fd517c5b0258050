use serde_json::{json, Map, Value};

use crate::models::{GrpcOptions, Proxy, WsOptions};
use crate::utils::url::{format_host, url_encode};

/// `host:port` for a URI authority.
pub(super) fn authority(proxy: &Proxy) -> String {
    format!("{}:{}", format_host(&proxy.server), proxy.port)
}

/// `#name` with the name percent-encoded.
pub(super) fn fragment(proxy: &Proxy) -> String {
    format!("#{}", url_encode(&proxy.name))
}

/// Starts a Clash entry with the shared leading keys.
pub(super) fn clash_entry(proxy: &Proxy) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("type".to_string(), json!(proxy.proxy_type().as_str()));
    map.insert("name".to_string(), json!(proxy.name));
    map.insert("server".to_string(), json!(proxy.server));
    map.insert("port".to_string(), json!(proxy.port));
    map
}

pub(super) fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        map.insert(key.to_string(), json!(value));
    }
}

/// Adds `network` plus `ws-opts` / `grpc-opts` to a Clash entry.
pub(super) fn clash_transport(
    map: &mut Map<String, Value>,
    network: &str,
    ws: Option<&WsOptions>,
    grpc: Option<&GrpcOptions>,
) {
    map.insert("network".to_string(), json!(network));
    if let Some(ws) = ws {
        let mut opts = Map::new();
        opts.insert("path".to_string(), json!(ws.path));
        if let Some(host) = &ws.host {
            opts.insert("headers".to_string(), json!({ "Host": host }));
        }
        map.insert("ws-opts".to_string(), Value::Object(opts));
    }
    if let Some(grpc) = grpc {
        map.insert(
            "grpc-opts".to_string(),
            json!({ "grpc-service-name": grpc.service_name }),
        );
    }
}

/// Starts a sing-box outbound with the shared leading keys.
pub(super) fn singbox_outbound(kind: &str, proxy: &Proxy) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("type".to_string(), json!(kind));
    map.insert("tag".to_string(), json!(proxy.name));
    map.insert("server".to_string(), json!(proxy.server));
    map.insert("server_port".to_string(), json!(proxy.port));
    map
}

/// sing-box `tls` object with the fields every TLS-capable outbound shares.
pub(super) fn singbox_tls(enabled: bool, server_name: Option<&str>, insecure: bool) -> Map<String, Value> {
    let mut tls = Map::new();
    tls.insert("enabled".to_string(), json!(enabled));
    insert_opt(&mut tls, "server_name", server_name);
    tls.insert("insecure".to_string(), json!(insecure));
    tls
}

pub(super) fn singbox_transport(
    ws: Option<&WsOptions>,
    grpc: Option<&GrpcOptions>,
) -> Option<Value> {
    if let Some(ws) = ws {
        let mut transport = Map::new();
        transport.insert("type".to_string(), json!("ws"));
        transport.insert("path".to_string(), json!(ws.path));
        if let Some(host) = &ws.host {
            transport.insert("headers".to_string(), json!({ "Host": host }));
        }
        return Some(Value::Object(transport));
    }
    grpc.map(|grpc| json!({ "type": "grpc", "service_name": grpc.service_name }))
}

/// Query parameters for `ws` / `grpc` transports on share-links.
pub(super) fn link_transport(
    pairs: &mut Vec<(&'static str, String)>,
    ws: Option<&WsOptions>,
    grpc: Option<&GrpcOptions>,
) {
    if let Some(ws) = ws {
        pairs.push(("path", ws.path.clone()));
        pairs.push(("host", ws.host.clone().unwrap_or_default()));
    }
    if let Some(grpc) = grpc {
        pairs.push(("serviceName", grpc.service_name.clone()));
    }
}

pub(super) fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
