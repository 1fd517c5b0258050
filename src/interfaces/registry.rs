use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, error};

use crate::error::{ConvertError, Result};
use crate::fetch::SubscriptionFetcher;
use crate::generator::adapters::AdapterRegistry;
use crate::generator::config::formats::{ClashGenerator, LoonGenerator, SingBoxGenerator, TxtGenerator};
use crate::interfaces::parsers::{ClashParser, LinkParser, SingBoxParser, SubscribeUrlParser};
use crate::models::{ParseOutcome, Proxy, ProxyType};
use crate::settings::Settings;

/// Format identifiers accepted on either side of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
    /// Newline separated share-links.
    Txt,
    ClashMeta,
    ClashPremium,
    SingBox,
    /// Generate-only.
    Loon,
    /// Parse-only: a URL resolved through a [`SubscriptionFetcher`].
    SubscribeUrl,
}

impl Format {
    pub const ALL: [Format; 6] = [
        Format::Txt,
        Format::ClashMeta,
        Format::ClashPremium,
        Format::SingBox,
        Format::Loon,
        Format::SubscribeUrl,
    ];

    /// Convert an identifier to a format
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "txt" => Some(Format::Txt),
            "clash-meta" => Some(Format::ClashMeta),
            "clash-premium" => Some(Format::ClashPremium),
            "sing-box" => Some(Format::SingBox),
            "loon" => Some(Format::Loon),
            "subscribe-url" => Some(Format::SubscribeUrl),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::ClashMeta => "clash-meta",
            Format::ClashPremium => "clash-premium",
            Format::SingBox => "sing-box",
            Format::Loon => "loon",
            Format::SubscribeUrl => "subscribe-url",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads one input format into proxies.
pub trait ProxyParser: Send + Sync {
    fn format(&self) -> Format;

    /// Bad entries are skipped and never fail the call; errors are reserved
    /// for collaborators such as the subscription fetcher.
    fn parse(&self, input: &str) -> Result<ParseOutcome>;
}

/// Writes proxies in one output format.
pub trait ProxyGenerator: Send + Sync {
    fn format(&self) -> Format;

    /// Protocols the target can express. Fixed for the lifetime of the generator.
    fn supported_protocols(&self) -> &'static [ProxyType];

    fn supports(&self, proxy_type: ProxyType) -> bool {
        self.supported_protocols().contains(&proxy_type)
    }

    /// Renders the proxies, all of which have a supported protocol.
    fn generate(&self, proxies: &[Proxy]) -> Result<String>;
}

/// Lookup table from format identifier to parser and generator
///
/// Built once, then only read. Registering a second parser or generator
/// for the same format is an error.
#[derive(Default)]
pub struct FormatRegistry {
    parsers: HashMap<Format, Box<dyn ProxyParser>>,
    generators: HashMap<Format, Box<dyn ProxyGenerator>>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in parser and generator, configured with default settings
    /// and without a subscription fetcher.
    pub fn with_defaults() -> Result<Self> {
        Self::with_settings(&Settings::default())
    }

    /// Every built-in parser and generator except `subscribe-url`, which
    /// needs a fetcher (see [`FormatRegistry::with_fetcher`]).
    pub fn with_settings(settings: &Settings) -> Result<Self> {
        let mut registry = FormatRegistry::new();
        let adapters = Arc::new(AdapterRegistry::with_defaults()?);

        registry.register_parser(Box::new(LinkParser))?;
        registry.register_parser(Box::new(ClashParser::new(Format::ClashMeta)))?;
        registry.register_parser(Box::new(ClashParser::new(Format::ClashPremium)))?;
        registry.register_parser(Box::new(SingBoxParser))?;

        registry.register_generator(Box::new(TxtGenerator::new(adapters.clone())))?;
        registry.register_generator(Box::new(ClashGenerator::meta(adapters.clone(), settings)))?;
        registry.register_generator(Box::new(ClashGenerator::premium(adapters.clone(), settings)))?;
        registry.register_generator(Box::new(SingBoxGenerator::new(adapters.clone(), settings)))?;
        registry.register_generator(Box::new(LoonGenerator::new(settings)))?;

        debug!(
            "Format registry ready with {} parsers and {} generators",
            registry.parsers.len(),
            registry.generators.len()
        );
        Ok(registry)
    }

    /// Registers the `subscribe-url` parser backed by `fetcher`.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn SubscriptionFetcher>) -> Result<Self> {
        self.register_parser(Box::new(SubscribeUrlParser::new(fetcher)))?;
        Ok(self)
    }

    pub fn register_parser(&mut self, parser: Box<dyn ProxyParser>) -> Result<()> {
        let format = parser.format();
        if self.parsers.contains_key(&format) {
            error!("Parser for {} registered twice", format);
            return Err(ConvertError::DuplicateFormat(format.to_string()));
        }
        self.parsers.insert(format, parser);
        Ok(())
    }

    pub fn register_generator(&mut self, generator: Box<dyn ProxyGenerator>) -> Result<()> {
        let format = generator.format();
        if self.generators.contains_key(&format) {
            error!("Generator for {} registered twice", format);
            return Err(ConvertError::DuplicateFormat(format.to_string()));
        }
        self.generators.insert(format, generator);
        Ok(())
    }

    /// Resolves an identifier to a format known to this registry.
    pub fn resolve(&self, id: &str) -> Result<Format> {
        Format::from_id(id)
            .filter(|format| self.parsers.contains_key(format) || self.generators.contains_key(format))
            .ok_or_else(|| ConvertError::UnknownFormat(id.to_string()))
    }

    pub fn parser(&self, format: Format) -> Result<&dyn ProxyParser> {
        self.parsers
            .get(&format)
            .map(|parser| parser.as_ref())
            .ok_or_else(|| ConvertError::MissingParser(format.to_string()))
    }

    pub fn generator(&self, format: Format) -> Result<&dyn ProxyGenerator> {
        self.generators
            .get(&format)
            .map(|generator| generator.as_ref())
            .ok_or_else(|| ConvertError::MissingGenerator(format.to_string()))
    }

    /// Formats with a registered parser, in declaration order.
    pub fn input_formats(&self) -> Vec<Format> {
        Format::ALL
            .into_iter()
            .filter(|format| self.parsers.contains_key(format))
            .collect()
    }

    /// Formats with a registered generator, in declaration order.
    pub fn output_formats(&self) -> Vec<Format> {
        Format::ALL
            .into_iter()
            .filter(|format| self.generators.contains_key(format))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ids() {
        for format in Format::ALL {
            assert_eq!(Format::from_id(format.as_str()), Some(format));
        }
        assert_eq!(Format::from_id(" Sing-Box "), Some(Format::SingBox));
        assert_eq!(Format::from_id("surge"), None);
    }

    #[test]
    fn test_default_tables() {
        let registry = FormatRegistry::with_defaults().unwrap();
        assert_eq!(
            registry.input_formats(),
            [Format::Txt, Format::ClashMeta, Format::ClashPremium, Format::SingBox]
        );
        assert_eq!(
            registry.output_formats(),
            [
                Format::Txt,
                Format::ClashMeta,
                Format::ClashPremium,
                Format::SingBox,
                Format::Loon
            ]
        );
    }

    #[test]
    fn test_lookup_errors() {
        let registry = FormatRegistry::with_defaults().unwrap();
        assert!(matches!(registry.resolve("surge"), Err(ConvertError::UnknownFormat(_))));
        assert!(matches!(
            registry.parser(Format::Loon),
            Err(ConvertError::MissingParser(id)) if id == "loon"
        ));
        assert!(matches!(
            registry.generator(Format::SubscribeUrl),
            Err(ConvertError::MissingGenerator(_))
        ));
        // subscribe-url has neither side until a fetcher is attached
        assert!(matches!(
            registry.resolve("subscribe-url"),
            Err(ConvertError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = FormatRegistry::with_defaults().unwrap();
        assert!(matches!(
            registry.register_parser(Box::new(LinkParser)),
            Err(ConvertError::DuplicateFormat(id)) if id == "txt"
        ));
        assert!(matches!(
            registry.register_generator(Box::new(TxtGenerator::new(Arc::new(
                AdapterRegistry::with_defaults().unwrap()
            )))),
            Err(ConvertError::DuplicateFormat(_))
        ));
    }

    #[test]
    fn test_capability_sets() {
        let registry = FormatRegistry::with_defaults().unwrap();
        let loon = registry.generator(Format::Loon).unwrap();
        assert_eq!(
            loon.supported_protocols(),
            [
                ProxyType::Shadowsocks,
                ProxyType::ShadowsocksR,
                ProxyType::VMess,
                ProxyType::Trojan
            ]
        );
        let singbox = registry.generator(Format::SingBox).unwrap();
        assert!(!singbox.supports(ProxyType::ShadowsocksR));
        assert!(!singbox.supports(ProxyType::Socks5));
        let premium = registry.generator(Format::ClashPremium).unwrap();
        for proxy_type in [ProxyType::Vless, ProxyType::Hysteria, ProxyType::Hysteria2] {
            assert!(!premium.supports(proxy_type));
        }
        let meta = registry.generator(Format::ClashMeta).unwrap();
        assert_eq!(meta.supported_protocols(), ProxyType::ALL);
    }
}
