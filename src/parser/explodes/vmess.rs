use log::debug;

use super::common::build;
use crate::models::{GrpcOptions, ParsedProxy, ProxySettings, VMessSettings, WsOptions};
use crate::utils::base64::base64_decode;
use crate::utils::json::{json_bool, json_port, json_str, json_str_any, json_u64, parse_json_tolerant};
use crate::utils::url::{split_fragment, strip_scheme, unbracket_host};

/// Parse a VMess link into a Proxy object
///
/// Layout: `vmess://base64(json)` with the V2RayN short keys
/// (`v, ps, add, port, id, aid, scy, net, type, host, path, tls, sni`).
///
/// `skip-cert-verify` defaults to `true` for `ws` + `tls` when the link has no
/// `allowInsecure` key. Every other link defaults to `false`.
pub fn explode_vmess(vmess: &str) -> Option<ParsedProxy> {
    let content = strip_scheme(vmess, "vmess://")?;
    let (encoded, fragment_name) = split_fragment(content);

    let decoded = base64_decode(encoded)?;
    let json = parse_json_tolerant(&decoded)?;
    let map = json.as_object()?;

    let server = unbracket_host(&json_str(map, "add")?);
    let port = match json_port(map, "port") {
        Some(port) => port,
        None => {
            debug!("Rejecting vmess link for {} without usable port", server);
            return None;
        }
    };
    let uuid = json_str(map, "id")?;

    let network = json_str(map, "net")
        .map(|net| net.to_ascii_lowercase())
        .unwrap_or_else(|| "tcp".to_string());
    let tls = json_str(map, "tls")
        .map(|tls| tls.eq_ignore_ascii_case("tls"))
        .unwrap_or(false);
    let skip_cert_verify = json_bool(map, "allowInsecure")
        .or_else(|| json_bool(map, "skip-cert-verify"))
        .unwrap_or(tls && network == "ws");

    let host = json_str(map, "host");
    let path = json_str(map, "path");
    let (ws_opts, grpc_opts) = match network.as_str() {
        "ws" => (
            Some(WsOptions {
                path: path.unwrap_or_else(|| "/".to_string()),
                host,
            }),
            None,
        ),
        "grpc" => (
            None,
            Some(GrpcOptions {
                service_name: path.unwrap_or_default(),
            }),
        ),
        _ => (None, None),
    };

    let settings = VMessSettings {
        uuid,
        alter_id: json_u64(map, "aid")
            .and_then(|aid| u32::try_from(aid).ok())
            .unwrap_or(0),
        cipher: json_str_any(map, &["scy", "security"]).unwrap_or_else(|| "auto".to_string()),
        network,
        tls,
        skip_cert_verify,
        servername: json_str(map, "sni"),
        ws_opts,
        grpc_opts,
    };

    let name = json_str(map, "ps").or(fragment_name);
    Some(build(name, server, port, ProxySettings::VMess(settings)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(parsed: &ParsedProxy) -> &VMessSettings {
        match parsed.proxy.settings() {
            ProxySettings::VMess(vmess) => vmess,
            other => panic!("unexpected settings {:?}", other),
        }
    }

    #[test]
    fn test_ws_tls_link_defaults_to_skip_cert_verify() {
        let parsed = explode_vmess("vmess://eyJ2IjogIjIiLCAicHMiOiAiVk0gV1MiLCAiYWRkIjogInZtLmV4YW1wbGUuY29tIiwgInBvcnQiOiAiNDQzIiwgImlkIjogImI4MzEzODFkLTYzMjQtNGQ1My1hZDRmLThjZGE0OGIzMDgxMSIsICJhaWQiOiAiMCIsICJzY3kiOiAiYXV0byIsICJuZXQiOiAid3MiLCAidHlwZSI6ICJub25lIiwgImhvc3QiOiAiY2RuLmV4YW1wbGUuY29tIiwgInBhdGgiOiAiL3JheSIsICJ0bHMiOiAidGxzIiwgInNuaSI6ICJ2bS5leGFtcGxlLmNvbSJ9").unwrap();
        assert_eq!(parsed.proxy.name, "VM WS");
        assert_eq!(parsed.proxy.server, "vm.example.com");
        assert_eq!(parsed.proxy.port, 443);
        let vmess = settings(&parsed);
        assert_eq!(vmess.uuid, "b831381d-6324-4d53-ad4f-8cda48b30811");
        assert_eq!(vmess.network, "ws");
        assert!(vmess.tls);
        assert!(vmess.skip_cert_verify);
        assert_eq!(vmess.servername.as_deref(), Some("vm.example.com"));
        let ws = vmess.ws_opts.as_ref().unwrap();
        assert_eq!(ws.path, "/ray");
        assert_eq!(ws.host.as_deref(), Some("cdn.example.com"));
    }

    #[test]
    fn test_numeric_fields_and_explicit_insecure() {
        let parsed = explode_vmess("vmess://eyJ2IjogIjIiLCAicHMiOiAiIiwgImFkZCI6ICIxLjEuMS4xIiwgInBvcnQiOiAxMDA4NiwgImlkIjogImI4MzEzODFkLTYzMjQtNGQ1My1hZDRmLThjZGE0OGIzMDgxMSIsICJhaWQiOiAyLCAibmV0IjogInRjcCIsICJ0bHMiOiAiIiwgImFsbG93SW5zZWN1cmUiOiB0cnVlfQ==").unwrap();
        assert_eq!(parsed.proxy.name, "VMess");
        assert_eq!(parsed.proxy.port, 10086);
        let vmess = settings(&parsed);
        assert_eq!(vmess.alter_id, 2);
        assert_eq!(vmess.cipher, "auto");
        assert!(!vmess.tls);
        assert!(vmess.skip_cert_verify);
        assert!(vmess.ws_opts.is_none());
    }

    #[test]
    fn test_malformed() {
        assert!(explode_vmess("vmess://not-base64!").is_none());
        // base64 of `{"add":"a.com"}` lacks port and id
        assert!(explode_vmess("vmess://eyJhZGQiOiJhLmNvbSJ9").is_none());
    }
}
