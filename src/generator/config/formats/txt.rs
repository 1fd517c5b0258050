use std::sync::Arc;

use log::warn;

use crate::error::Result;
use crate::generator::adapters::AdapterRegistry;
use crate::interfaces::{Format, ProxyGenerator};
use crate::models::{Proxy, ProxyType};

/// Share-links, one per line.
pub struct TxtGenerator {
    adapters: Arc<AdapterRegistry>,
}

impl TxtGenerator {
    pub fn new(adapters: Arc<AdapterRegistry>) -> Self {
        TxtGenerator { adapters }
    }
}

impl ProxyGenerator for TxtGenerator {
    fn format(&self) -> Format {
        Format::Txt
    }

    fn supported_protocols(&self) -> &'static [ProxyType] {
        &ProxyType::ALL
    }

    fn generate(&self, proxies: &[Proxy]) -> Result<String> {
        let mut links = Vec::with_capacity(proxies.len());
        for proxy in proxies {
            match self.adapters.for_proxy(proxy)?.to_link(proxy) {
                Some(link) => links.push(link),
                None => warn!("No share-link form for {} proxy {}", proxy.proxy_type(), proxy.name),
            }
        }
        Ok(links.join("\n"))
    }
}
