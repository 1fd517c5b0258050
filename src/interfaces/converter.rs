use std::collections::BTreeMap;

use log::{debug, info};

use crate::error::Result;
use crate::interfaces::registry::FormatRegistry;
use crate::models::{ConversionResult, Proxy, ProxyType};

/// Parses, filters by target capability and generates
///
/// Borrows a [`FormatRegistry`] that was fully populated beforehand.
pub struct Converter<'a> {
    registry: &'a FormatRegistry,
}

impl<'a> Converter<'a> {
    pub fn new(registry: &'a FormatRegistry) -> Self {
        Converter { registry }
    }

    /// Convert `input` from one format identifier to another
    ///
    /// Both identifiers are checked first, so a bad format fails even for
    /// empty input. Empty or whitespace-only input then yields an empty
    /// result without running the parser or the generator.
    ///
    /// Proxies whose protocol the target cannot express are removed and
    /// counted per protocol in `dropped`; the parser's unsupported tokens
    /// are passed through.
    pub fn convert(&self, input: &str, from: &str, to: &str) -> Result<ConversionResult> {
        let parser = self.registry.parser(self.registry.resolve(from)?)?;
        let generator = self.registry.generator(self.registry.resolve(to)?)?;

        if input.trim().is_empty() {
            debug!("Empty input, nothing to convert");
            return Ok(ConversionResult::default());
        }

        let outcome = parser.parse(input)?;
        let (kept, dropped) = partition_supported(outcome.proxies, |proxy_type| {
            generator.supports(proxy_type)
        });

        let output = generator.generate(&kept)?;
        let result = ConversionResult {
            output,
            dropped,
            unsupported: outcome.unsupported,
            kept: kept.len(),
        };

        info!(
            "Converted {} -> {}: kept {}, dropped {}, unsupported {}",
            parser.format(),
            generator.format(),
            result.kept,
            result.total_dropped(),
            result.unsupported.len()
        );
        Ok(result)
    }
}

/// Splits proxies into the ones `supports` accepts and per-protocol drop counts.
pub fn partition_supported<F>(proxies: Vec<Proxy>, supports: F) -> (Vec<Proxy>, BTreeMap<ProxyType, usize>)
where
    F: Fn(ProxyType) -> bool,
{
    let mut kept = Vec::with_capacity(proxies.len());
    let mut dropped = BTreeMap::new();

    for proxy in proxies {
        let proxy_type = proxy.proxy_type();
        if supports(proxy_type) {
            kept.push(proxy);
        } else {
            debug!("Dropping {} proxy {}", proxy_type, proxy.name);
            *dropped.entry(proxy_type).or_insert(0) += 1;
        }
    }
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    const LINKS: &str = "vless://b831381d-6324-4d53-ad4f-8cda48b30811@v.example.com:443?security=tls&type=tcp#v\n\
                         ss://YWVzLTEyOC1nY206cGFzcw@1.2.3.4:8388#s\n\
                         ss://YWVzLTEyOC1nY206cGFzcw@1.2.3.5:8388#s2\n";

    #[test]
    fn test_drop_counts() {
        let registry = FormatRegistry::with_defaults().unwrap();
        let result = Converter::new(&registry).convert(LINKS, "txt", "clash-premium").unwrap();
        assert_eq!(result.kept, 2);
        assert_eq!(result.dropped.get(&ProxyType::Vless), Some(&1));
        assert_eq!(result.total_dropped(), 1);
        assert!(result.output.contains("\"name\":\"s2\""));
        assert!(!result.output.contains("vless"));
    }

    #[test]
    fn test_empty_input() {
        let registry = FormatRegistry::with_defaults().unwrap();
        let converter = Converter::new(&registry);
        assert_eq!(converter.convert("  \n ", "txt", "loon").unwrap(), ConversionResult::default());
        assert!(matches!(
            converter.convert("", "txt", "surge"),
            Err(ConvertError::UnknownFormat(_))
        ));
        assert!(matches!(
            converter.convert("", "loon", "txt"),
            Err(ConvertError::MissingParser(_))
        ));
    }

    #[test]
    fn test_partition_keeps_order() {
        let registry = FormatRegistry::with_defaults().unwrap();
        let outcome = registry.parser(crate::interfaces::Format::Txt).unwrap().parse(LINKS).unwrap();
        let (kept, dropped) = partition_supported(outcome.proxies, |t| t == ProxyType::Shadowsocks);
        let names: Vec<&str> = kept.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["s", "s2"]);
        assert_eq!(dropped.len(), 1);
    }
}
