//! Per-protocol output adapters
//!
//! Each adapter turns one proxy of its protocol into a share-link, a Clash
//! proxy entry and a sing-box outbound. An adapter returns `None` when the
//! proxy belongs to another protocol or the target cannot express it.

mod common;
mod hysteria;
mod plain;
mod shadowsocks;
mod trojan;
mod v2ray;

use std::collections::HashMap;

use log::error;
use serde_json::{Map, Value};

use crate::error::{ConvertError, Result};
use crate::models::{Proxy, ProxyType};

pub use hysteria::{Hysteria2Adapter, HysteriaAdapter};
pub use plain::{HttpAdapter, Socks5Adapter};
pub use shadowsocks::{ShadowsocksAdapter, ShadowsocksRAdapter};
pub use trojan::TrojanAdapter;
pub use v2ray::{VMessAdapter, VlessAdapter};

/// The three conversions every protocol provides.
pub trait ProxyAdapter: Send + Sync {
    /// Protocol handled by this adapter.
    fn proxy_type(&self) -> ProxyType;

    /// Share-link form, parseable by the matching `explode_*` function.
    fn to_link(&self, proxy: &Proxy) -> Option<String>;

    /// Clash proxy entry. Keys start with `type`, `name`, `server`, `port`.
    fn to_clash(&self, proxy: &Proxy) -> Option<Map<String, Value>>;

    /// sing-box outbound, `None` where sing-box has no such outbound.
    fn to_singbox(&self, proxy: &Proxy) -> Option<Value>;
}

/// Lookup table from protocol to adapter.
pub struct AdapterRegistry {
    adapters: HashMap<ProxyType, Box<dyn ProxyAdapter>>,
}

impl AdapterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        AdapterRegistry {
            adapters: HashMap::new(),
        }
    }

    /// A registry holding the adapter for every supported protocol.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = AdapterRegistry::new();
        registry.register(Box::new(ShadowsocksAdapter))?;
        registry.register(Box::new(ShadowsocksRAdapter))?;
        registry.register(Box::new(VMessAdapter))?;
        registry.register(Box::new(VlessAdapter))?;
        registry.register(Box::new(TrojanAdapter))?;
        registry.register(Box::new(HysteriaAdapter))?;
        registry.register(Box::new(Hysteria2Adapter))?;
        registry.register(Box::new(HttpAdapter))?;
        registry.register(Box::new(Socks5Adapter))?;
        Ok(registry)
    }

    /// Adds an adapter. A second adapter for the same protocol is rejected.
    pub fn register(&mut self, adapter: Box<dyn ProxyAdapter>) -> Result<()> {
        let proxy_type = adapter.proxy_type();
        if self.adapters.contains_key(&proxy_type) {
            error!("Adapter for {} registered twice", proxy_type);
            return Err(ConvertError::DuplicateAdapter(proxy_type.as_str()));
        }
        self.adapters.insert(proxy_type, adapter);
        Ok(())
    }

    pub fn get(&self, proxy_type: ProxyType) -> Result<&dyn ProxyAdapter> {
        self.adapters
            .get(&proxy_type)
            .map(|adapter| adapter.as_ref())
            .ok_or(ConvertError::MissingAdapter(proxy_type.as_str()))
    }

    /// Adapter for the proxy's own protocol.
    pub fn for_proxy(&self, proxy: &Proxy) -> Result<&dyn ProxyAdapter> {
        self.get(proxy.proxy_type())
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_protocol() {
        let registry = AdapterRegistry::with_defaults().unwrap();
        for proxy_type in ProxyType::ALL {
            assert_eq!(registry.get(proxy_type).unwrap().proxy_type(), proxy_type);
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = AdapterRegistry::new();
        registry.register(Box::new(TrojanAdapter)).unwrap();
        assert!(matches!(
            registry.register(Box::new(TrojanAdapter)),
            Err(ConvertError::DuplicateAdapter("trojan"))
        ));
    }

    #[test]
    fn test_missing_adapter() {
        let registry = AdapterRegistry::new();
        assert!(matches!(
            registry.get(ProxyType::Http),
            Err(ConvertError::MissingAdapter("http"))
        ));
    }
}
