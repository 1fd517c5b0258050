use super::common::build;
use crate::models::{HttpSettings, ParsedProxy, ProxySettings, Socks5Settings};
use crate::utils::non_empty;
use crate::utils::url::{parse_port, parse_query, split_fragment, strip_scheme};

/// Parse a Telegram proxy link into a Proxy object
///
/// Accepts `https://t.me/socks?server=...&port=...&user=...&pass=...` and
/// the `https://t.me/http?` form, plus their `tg://socks?` / `tg://http?`
/// equivalents. The `remarks` parameter or the fragment names the proxy.
pub fn explode_telegram(link: &str) -> Option<ParsedProxy> {
    let rest = strip_scheme(link, "https://t.me/").or_else(|| strip_scheme(link, "tg://"))?;

    let (kind, query) = rest.split_once('?')?;
    let is_socks = match kind.trim_end_matches('/').to_ascii_lowercase().as_str() {
        "socks" => true,
        "http" => false,
        _ => return None,
    };

    let (query, fragment) = split_fragment(query);
    let params = parse_query(query);

    let server = params.get("server").and_then(non_empty)?;
    let port = params.get("port").and_then(|p| parse_port(p))?;
    let username = params.get("user").and_then(non_empty);
    let password = params.get("pass").and_then(non_empty);
    let name = params.get("remarks").and_then(non_empty).or(fragment);

    let settings = if is_socks {
        ProxySettings::Socks5(Socks5Settings {
            username,
            password,
            ..Default::default()
        })
    } else {
        ProxySettings::Http(HttpSettings {
            username,
            password,
            ..Default::default()
        })
    };

    Some(build(name, server, port, settings))
}
