use log::debug;

use super::common::{build, param, split_url};
use crate::models::{HttpSettings, ParsedProxy, ProxySettings};
use crate::utils::url::{parse_flag, strip_scheme};

/// Parse an HTTP/HTTPS link into a Proxy object
///
/// Layout: `http(s)://[user:pass@]host:port[/?skip-cert-verify=1]#name`.
/// URLs carrying a real path (subscription or web page addresses) are not
/// proxies and are rejected.
pub fn explode_http(http: &str) -> Option<ParsedProxy> {
    let tls = if strip_scheme(http, "https://").is_some() {
        true
    } else if strip_scheme(http, "http://").is_some() {
        false
    } else {
        return None;
    };

    let parts = split_url(http)?;
    if !parts.path.is_empty() && parts.path != "/" {
        debug!("Ignoring {} URL with path {}", parts.server, parts.path);
        return None;
    }
    let port = parts.port?;

    let settings = HttpSettings {
        username: parts.username,
        password: parts.password,
        tls,
        skip_cert_verify: param(&parts.params, &["skip-cert-verify", "allowInsecure"])
            .map(|v| parse_flag(&v))
            .unwrap_or(false),
    };

    Some(build(parts.name, parts.server, port, ProxySettings::Http(settings)))
}
