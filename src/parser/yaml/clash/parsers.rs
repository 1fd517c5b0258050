use log::{info, warn};

use crate::models::ParseOutcome;
use crate::parser::types::ParsedBatch;

use super::proxy_types::{proxy_from_clash_map, ClashEntryError};
use super::scanner::extract_proxy_maps;

/// Parse the proxies of a Clash configuration
///
/// Reads the `proxies:` list with the restricted scanner and converts every
/// entry. Entries without a `type` or with missing required fields are
/// skipped; entries naming a protocol this crate does not know are reported
/// in `unsupported`. Names are de-duplicated before returning.
pub fn parse_clash_yaml(content: &str) -> ParseOutcome {
    let batch = explode_clash(content);
    info!(
        "Parsed {} proxies from Clash config ({} unsupported types)",
        batch.len(),
        batch.unsupported().len()
    );
    batch.finish()
}

/// Converts the `proxies:` entries without de-duplicating names.
pub fn explode_clash(content: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::new();

    for entry in extract_proxy_maps(content) {
        match proxy_from_clash_map(&entry) {
            Ok(parsed) => batch.push(parsed),
            Err(ClashEntryError::Unsupported(tag)) => {
                warn!("Skipping unsupported proxy type {}", tag);
                batch.push_unsupported(tag);
            }
            Err(err) => warn!("Skipping proxy entry: {}", err),
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProxySettings, ProxyType};

    #[test]
    fn test_parse_mixed_styles() {
        let yaml = r#"
port: 7890
proxies:
  - {name: Test, type: ss, server: test.com, port: 443, cipher: aes-128-gcm, password: pw}
  - name: Test
    type: trojan
    server: t.com
    port: 443
    password: secret
    udp: true
  - {name: wg, type: wireguard, server: w.com, port: 51820}
  - {name: broken, server: b.com, port: 1}
  - type: hysteria2
    server: h.com
    port: 8443
    password: pw
proxy-groups:
  - name: Proxy
    type: select
    proxies: [Test]
"#;
        let outcome = parse_clash_yaml(yaml);
        assert_eq!(outcome.unsupported, vec!["wireguard"]);
        let names: Vec<&str> = outcome.proxies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Test_1", "Test_2", "defaultName_1"]);
        assert_eq!(outcome.proxies[2].proxy_type(), ProxyType::Hysteria2);

        let ProxySettings::Trojan(trojan) = outcome.proxies[1].settings() else {
            panic!("expected trojan");
        };
        assert!(trojan.udp);
    }

    #[test]
    fn test_empty_document() {
        let outcome = parse_clash_yaml("");
        assert!(outcome.proxies.is_empty());
        assert!(outcome.unsupported.is_empty());
    }
}
