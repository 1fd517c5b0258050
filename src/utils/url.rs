//! URL encoding/decoding utilities

use std::collections::HashMap;

/// Encodes a string using URL encoding
///
/// # Examples
/// ```
/// use proxyconv::utils::url::url_encode;
///
/// let encoded = url_encode("Hello World!");
/// assert_eq!(encoded, "Hello%20World%21");
/// ```
pub fn url_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Decodes a URL-encoded string
///
/// `+` is kept literally since share-links carry Base64 payloads in query
/// values. Returns the original string if decoding fails.
///
/// # Examples
/// ```
/// use proxyconv::utils::url::url_decode;
///
/// let decoded = url_decode("Hello%20World%21");
/// assert_eq!(decoded, "Hello World!");
/// ```
pub fn url_decode(input: &str) -> String {
    urlencoding::decode(input)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

/// Parses a query string (without the leading `?`) into a map.
///
/// Keys and values are percent-decoded. When a key repeats, the first
/// occurrence wins. Pairs without `=` map to an empty value.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params
            .entry(url_decode(key))
            .or_insert_with(|| url_decode(value));
    }
    params
}

/// Builds a query string from ordered pairs, skipping empty values.
pub fn build_query(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, url_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Splits a link body at the first `#`, returning the body and the
/// percent-decoded fragment (if non-empty).
pub fn split_fragment(input: &str) -> (&str, Option<String>) {
    match input.split_once('#') {
        Some((body, fragment)) => {
            let name = url_decode(fragment).trim().to_string();
            (body, if name.is_empty() { None } else { Some(name) })
        }
        None => (input, None),
    }
}

/// Interprets the usual truthy spellings found in share-link parameters.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Strips a case-insensitive scheme prefix such as `ss://`.
pub fn strip_scheme<'a>(link: &'a str, scheme: &str) -> Option<&'a str> {
    let head = link.get(..scheme.len())?;
    if head.eq_ignore_ascii_case(scheme) {
        Some(&link[scheme.len()..])
    } else {
        None
    }
}

/// Splits `host:port`, accepting bracketed IPv6 literals.
///
/// The returned host never carries brackets. A port of zero is rejected.
pub fn split_host_port(input: &str) -> Option<(String, u16)> {
    let input = input.trim().trim_end_matches('/');
    let (host, port) = if let Some(rest) = input.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        (host, tail.strip_prefix(':')?)
    } else {
        input.rsplit_once(':')?
    };
    if host.is_empty() {
        return None;
    }
    let port = parse_port(port)?;
    Some((host.to_string(), port))
}

/// Parses a non-zero TCP/UDP port.
pub fn parse_port(input: &str) -> Option<u16> {
    match input.trim().parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(port) => Some(port),
    }
}

/// Formats a host for use inside a URI authority, bracketing IPv6 literals.
pub fn format_host(server: &str) -> String {
    if server.contains(':') && !server.starts_with('[') {
        format!("[{}]", server)
    } else {
        server.to_string()
    }
}

/// Removes the brackets the `url` crate keeps around IPv6 hosts.
pub fn unbracket_host(host: &str) -> String {
    host.trim_start_matches('[').trim_end_matches(']').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_decodes_and_keeps_first() {
        let params = parse_query("sni=a.com&path=%2Fws&sni=b.com&flag");
        assert_eq!(params.get("sni").map(String::as_str), Some("a.com"));
        assert_eq!(params.get("path").map(String::as_str), Some("/ws"));
        assert_eq!(params.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn test_parse_query_keeps_plus() {
        let params = parse_query("pbk=ab+cd");
        assert_eq!(params.get("pbk").map(String::as_str), Some("ab+cd"));
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(
            split_fragment("abc#%E6%B5%8B%E8%AF%95"),
            ("abc", Some("测试".to_string()))
        );
        assert_eq!(split_fragment("abc#"), ("abc", None));
        assert_eq!(split_fragment("abc"), ("abc", None));
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(
            split_host_port("example.com:443"),
            Some(("example.com".to_string(), 443))
        );
        assert_eq!(
            split_host_port("[2001:db8::1]:8388/"),
            Some(("2001:db8::1".to_string(), 8388))
        );
        assert_eq!(split_host_port("example.com:0"), None);
        assert_eq!(split_host_port("example.com"), None);
        assert_eq!(split_host_port(":443"), None);
    }

    #[test]
    fn test_strip_scheme_is_case_insensitive() {
        assert_eq!(strip_scheme("VMess://abc", "vmess://"), Some("abc"));
        assert_eq!(strip_scheme("ss://abc", "ssr://"), None);
        assert_eq!(strip_scheme("ss", "ssr://"), None);
    }

    #[test]
    fn test_build_query_skips_empty() {
        let query = build_query(&[
            ("security", "tls".to_string()),
            ("sni", String::new()),
            ("path", "/a b".to_string()),
        ]);
        assert_eq!(query, "security=tls&path=%2Fa%20b");
    }

    #[test]
    fn test_format_host() {
        assert_eq!(format_host("2001:db8::1"), "[2001:db8::1]");
        assert_eq!(format_host("1.2.3.4"), "1.2.3.4");
    }
}
