//! Results handed back by parsers and the converter.

use std::collections::BTreeMap;

use super::proxy::{Proxy, ProxyType};

/// A freshly parsed proxy together with the name its source gave it.
///
/// `original_name` is `None` when the source carried no name and
/// `proxy.name` holds the protocol placeholder instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProxy {
    pub proxy: Proxy,
    pub original_name: Option<String>,
}

impl ParsedProxy {
    /// Wraps a proxy, falling back to the protocol placeholder for a missing name.
    pub fn new(proxy: Proxy, original_name: Option<String>) -> Self {
        let mut proxy = proxy;
        match &original_name {
            Some(name) => proxy.name = name.clone(),
            None => proxy.name = proxy.proxy_type().default_name().to_string(),
        }
        ParsedProxy {
            proxy,
            original_name,
        }
    }

    /// Treats the proxy's current name as user-supplied.
    pub fn named(proxy: Proxy) -> Self {
        let name = proxy.name.clone();
        ParsedProxy::new(proxy, Some(name))
    }
}

/// Output of an input-format parser: de-duplicated proxies in source order
/// plus the protocol tokens that were recognised as links but not understood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub proxies: Vec<Proxy>,
    pub unsupported: Vec<String>,
}

/// Output of a full conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionResult {
    pub output: String,
    /// Proxies removed because the target cannot express their protocol.
    pub dropped: BTreeMap<ProxyType, usize>,
    pub unsupported: Vec<String>,
    /// Number of proxies that made it into the output.
    pub kept: usize,
}

impl ConversionResult {
    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }
}
