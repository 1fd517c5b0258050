use log::debug;

use super::common::build;
use crate::models::{ParsedProxy, ProxySettings, ShadowsocksSettings};
use crate::utils::base64::base64_decode;
use crate::utils::non_empty;
use crate::utils::url::{parse_query, split_fragment, split_host_port, strip_scheme, url_decode};

/// Parse a Shadowsocks link into a Proxy object
///
/// Two layouts are in circulation:
/// * legacy: `ss://base64(method:password@host:port)#name`
/// * SIP002: `ss://base64(method:password)@host:port/?plugin=...#name`
///
/// The legacy layout is tried first; if the decoded payload has no `@`, only
/// the userinfo before `@` is decoded.
pub fn explode_ss(ss: &str) -> Option<ParsedProxy> {
    let content = strip_scheme(ss, "ss://")?;

    // Extract fragment (remark) if present
    let (content, name) = split_fragment(content);
    let content = content.replace("/?", "?");

    // Extract plugin and other query parameters
    let (main, query) = match content.split_once('?') {
        Some((main, query)) => (main.to_string(), query.to_string()),
        None => (content.clone(), String::new()),
    };
    let main = main.trim_end_matches('/');

    let (userinfo, host_port) = match base64_decode(main).filter(|decoded| decoded.contains('@')) {
        Some(decoded) => {
            let (userinfo, host_port) = decoded.rsplit_once('@')?;
            (userinfo.to_string(), host_port.to_string())
        }
        None => {
            let (encoded, host_port) = main.rsplit_once('@')?;
            let encoded = url_decode(encoded);
            let userinfo = base64_decode(&encoded)
                .filter(|decoded| decoded.contains(':'))
                .unwrap_or(encoded);
            (userinfo, host_port.to_string())
        }
    };

    let (cipher, password) = userinfo.split_once(':')?;
    if cipher.is_empty() {
        debug!("Rejecting ss link without cipher");
        return None;
    }
    let (server, port) = split_host_port(&host_port)?;

    let mut settings = ShadowsocksSettings {
        cipher: cipher.to_string(),
        password: password.to_string(),
        ..Default::default()
    };

    let params = parse_query(&query);
    if let Some(plugin) = params.get("plugin").and_then(non_empty) {
        match plugin.split_once(';') {
            Some((name, opts)) => {
                settings.plugin = non_empty(name);
                settings.plugin_opts = non_empty(opts);
            }
            None => settings.plugin = Some(plugin),
        }
    }

    Some(build(
        name,
        server,
        port,
        ProxySettings::Shadowsocks(settings),
    ))
}
