use super::common::{build, param, split_url};
use crate::models::{
    HysteriaSettings, ParsedProxy, ProxySettings, DEFAULT_DOWN_MBPS, DEFAULT_UP_MBPS,
};
use crate::utils::url::{parse_flag, strip_scheme};

/// Parse a Hysteria link into a Proxy object
///
/// Layout: `hysteria://host:port?protocol=udp&auth=...&peer=...&upmbps=10&downmbps=50&alpn=h3#name`
pub fn explode_hysteria(hysteria: &str) -> Option<ParsedProxy> {
    strip_scheme(hysteria, "hysteria://")?;
    let parts = split_url(hysteria)?;
    let port = parts.port?;
    let params = &parts.params;

    let alpn = param(params, &["alpn"])
        .map(|alpn| {
            alpn.split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let settings = HysteriaSettings {
        auth: param(params, &["auth", "auth_str", "auth-str"]).or(parts.username.clone()),
        protocol: param(params, &["protocol"]).unwrap_or_else(|| "udp".to_string()),
        skip_cert_verify: param(params, &["insecure", "allowInsecure"])
            .map(|v| parse_flag(&v))
            .unwrap_or(false),
        sni: param(params, &["peer", "sni"]),
        up: param(params, &["upmbps", "up"])
            .and_then(|v| parse_mbps(&v))
            .unwrap_or(DEFAULT_UP_MBPS),
        down: param(params, &["downmbps", "down"])
            .and_then(|v| parse_mbps(&v))
            .unwrap_or(DEFAULT_DOWN_MBPS),
        alpn,
        obfs: param(params, &["obfsParam", "obfs-password", "obfs"]),
    };

    Some(build(
        parts.name,
        parts.server,
        port,
        ProxySettings::Hysteria(settings),
    ))
}

/// Reads a bandwidth hint such as `50`, `"50 Mbps"` or `"100mbps"`.
pub fn parse_mbps(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok().filter(|mbps| *mbps > 0)
}
