//! Input-format parsers behind the [`ProxyParser`] trait.

use std::sync::Arc;

use log::{info, warn};

use crate::error::{ConvertError, Result};
use crate::fetch::SubscriptionFetcher;
use crate::interfaces::registry::{Format, ProxyParser};
use crate::models::ParseOutcome;
use crate::parser::{classify_subscription, parse_clash_yaml, parse_multiple_proxies, parse_singbox_json, ContentKind};

/// `txt`: one share-link per line.
pub struct LinkParser;

impl ProxyParser for LinkParser {
    fn format(&self) -> Format {
        Format::Txt
    }

    fn parse(&self, input: &str) -> Result<ParseOutcome> {
        Ok(parse_multiple_proxies(input))
    }
}

/// `clash-meta` and `clash-premium` read the same YAML shape.
pub struct ClashParser {
    format: Format,
}

impl ClashParser {
    pub fn new(format: Format) -> Self {
        ClashParser { format }
    }
}

impl ProxyParser for ClashParser {
    fn format(&self) -> Format {
        self.format
    }

    fn parse(&self, input: &str) -> Result<ParseOutcome> {
        Ok(parse_clash_yaml(input))
    }
}

pub struct SingBoxParser;

impl ProxyParser for SingBoxParser {
    fn format(&self) -> Format {
        Format::SingBox
    }

    fn parse(&self, input: &str) -> Result<ParseOutcome> {
        Ok(parse_singbox_json(input))
    }
}

/// `subscribe-url`: downloads the subscription and hands the body to the
/// parser its classification points at.
pub struct SubscribeUrlParser {
    fetcher: Arc<dyn SubscriptionFetcher>,
}

impl SubscribeUrlParser {
    pub fn new(fetcher: Arc<dyn SubscriptionFetcher>) -> Self {
        SubscribeUrlParser { fetcher }
    }
}

impl ProxyParser for SubscribeUrlParser {
    fn format(&self) -> Format {
        Format::SubscribeUrl
    }

    fn parse(&self, input: &str) -> Result<ParseOutcome> {
        let url = input
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| ConvertError::InvalidInput("empty subscription URL".to_string()))?;

        let content = self.fetcher.fetch(url)?;
        let kind = classify_subscription(&content);
        info!("Subscription {} classified as {}", url, kind);

        match kind {
            ContentKind::Yaml => Ok(parse_clash_yaml(&content)),
            ContentKind::Base64 => Ok(parse_multiple_proxies(&content)),
            ContentKind::Unknown => {
                let trimmed = content.trim_start();
                if trimmed.starts_with('{') || trimmed.starts_with('[') {
                    return Ok(parse_singbox_json(&content));
                }
                warn!("Subscription {} has no recognisable proxies", url);
                Ok(ParseOutcome::default())
            }
        }
    }
}
