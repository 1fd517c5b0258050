use log::debug;

use super::common::build;
use crate::models::{ParsedProxy, ProxySettings, ShadowsocksRSettings};
use crate::utils::base64::base64_decode;
use crate::utils::non_empty;
use crate::utils::url::{parse_port, parse_query, strip_scheme};

/// Cipher spelling used by SSR links for "no encryption".
pub const SSR_DUMMY_CIPHER: &str = "dummy";
/// Cipher spelling the proxy model uses for the same thing.
pub const SSR_AUTO_CIPHER: &str = "auto";

/// Spelling of an SSR cipher on the wire (links, Clash, Loon).
pub fn ssr_wire_cipher(cipher: &str) -> &str {
    if cipher == SSR_AUTO_CIPHER {
        SSR_DUMMY_CIPHER
    } else {
        cipher
    }
}

/// Parse a ShadowsocksR link into a Proxy object
///
/// Layout: `ssr://base64(server:port:protocol:method:obfs:base64(password)/?params)`
/// where every value in `params` is itself Base64 encoded.
pub fn explode_ssr(ssr: &str) -> Option<ParsedProxy> {
    let encoded = strip_scheme(ssr, "ssr://")?;
    let decoded = base64_decode(encoded.trim())?;

    let (main, query) = match decoded.split_once("/?") {
        Some((main, query)) => (main, query),
        None => (decoded.trim_end_matches('/'), ""),
    };

    // The server may be an IPv6 literal, so split from the right.
    let mut parts = main.rsplitn(6, ':');
    let password_b64 = parts.next()?;
    let obfs = parts.next()?;
    let method = parts.next()?;
    let protocol = parts.next()?;
    let port = parse_port(parts.next()?)?;
    let server = parts
        .next()?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    if server.is_empty() {
        return None;
    }

    let password = match base64_decode(password_b64) {
        Some(password) => password,
        None => {
            debug!("Rejecting ssr link with undecodable password");
            return None;
        }
    };

    let params = parse_query(query);
    let decode_param = |key: &str| -> Option<String> {
        params
            .get(key)
            .and_then(|value| base64_decode(value))
            .and_then(non_empty)
    };

    let cipher = if method.eq_ignore_ascii_case(SSR_DUMMY_CIPHER) {
        SSR_AUTO_CIPHER.to_string()
    } else {
        method.to_string()
    };

    let settings = ShadowsocksRSettings {
        cipher,
        password,
        protocol: protocol.to_string(),
        protocol_param: decode_param("protoparam").unwrap_or_default(),
        obfs: obfs.to_string(),
        obfs_param: decode_param("obfsparam").unwrap_or_default(),
        group: decode_param("group"),
    };

    Some(build(
        decode_param("remarks"),
        server,
        port,
        ProxySettings::ShadowsocksR(settings),
    ))
}
