use super::common::{build, param};
use crate::models::{Hysteria2Settings, ParsedProxy, ProxySettings};
use crate::utils::url::{parse_flag, parse_query, split_host_port, strip_scheme, url_decode};

/// Parse a Hysteria2 link into a Proxy object
///
/// Layout: `hysteria2://password@host:port/?sni=...&insecure=1&obfs=salamander#name`
/// (`hy2://` is accepted too).
///
/// Parsed by hand rather than with a URL parser: passwords routinely carry
/// unescaped reserved characters, including `@`. The `@` that separates the
/// password is the first one followed by a valid `host:port`. An `@` inside
/// the `#name` fragment is never considered.
pub fn explode_hysteria2(hysteria2: &str) -> Option<ParsedProxy> {
    let rest = strip_scheme(hysteria2, "hysteria2://")
        .or_else(|| strip_scheme(hysteria2, "hy2://"))?;

    let (password, server, port, tail) = split_authority(rest)?;

    // What follows the authority: optional `/`, optional `?query`, optional `#name`
    let tail = tail.trim_start_matches('/');
    let (tail, fragment) = match tail.split_once('#') {
        Some((tail, fragment)) => (tail, Some(fragment)),
        None => (tail, None),
    };
    let params = parse_query(tail.strip_prefix('?').unwrap_or(tail));
    let name = fragment
        .map(url_decode)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let settings = Hysteria2Settings {
        password,
        skip_cert_verify: param(&params, &["insecure", "allowInsecure"])
            .map(|v| parse_flag(&v))
            .unwrap_or(false),
        sni: param(&params, &["sni", "peer"]),
        obfs: param(&params, &["obfs"]),
        obfs_password: param(&params, &["obfs-password"]),
    };

    Some(build(name, server, port, ProxySettings::Hysteria2(settings)))
}

/// Splits `password@host:port<tail>`; the password may be absent.
fn split_authority(rest: &str) -> Option<(String, String, u16, &str)> {
    let authority_end = rest.find('#').unwrap_or(rest.len());

    for (at, _) in rest[..authority_end].match_indices('@') {
        let after = &rest[at + 1..];
        let end = after.find(&['/', '?', '#'][..]).unwrap_or(after.len());
        if let Some((server, port)) = split_host_port(&after[..end]) {
            let password = url_decode(&rest[..at]);
            return Some((password, server, port, &after[end..]));
        }
    }

    // No password at all
    let end = rest.find(&['/', '?', '#'][..]).unwrap_or(rest.len());
    let (server, port) = split_host_port(&rest[..end])?;
    Some((String::new(), server, port, &rest[end..]))
}
