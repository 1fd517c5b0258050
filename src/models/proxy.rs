//! Proxy model definitions
//!
//! Contains the core data structures for proxy configurations.

use std::fmt;
use std::str::FromStr;

use super::proxy_node::{
    Hysteria2Settings, HysteriaSettings, HttpSettings, ShadowsocksRSettings, ShadowsocksSettings,
    Socks5Settings, TrojanSettings, VMessSettings, VlessSettings,
};

/// Represents the type of a proxy.
/// This is the canonical enum used for proxy type identification across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProxyType {
    Shadowsocks,
    ShadowsocksR,
    VMess,
    Vless,
    Trojan,
    Hysteria,
    Hysteria2,
    Http,
    Socks5,
}

impl ProxyType {
    /// Every supported protocol, in the order they are documented.
    pub const ALL: [ProxyType; 9] = [
        ProxyType::Shadowsocks,
        ProxyType::ShadowsocksR,
        ProxyType::VMess,
        ProxyType::Vless,
        ProxyType::Trojan,
        ProxyType::Hysteria,
        ProxyType::Hysteria2,
        ProxyType::Http,
        ProxyType::Socks5,
    ];

    /// The protocol tag as written in Clash `type:` fields and drop reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyType::Shadowsocks => "ss",
            ProxyType::ShadowsocksR => "ssr",
            ProxyType::VMess => "vmess",
            ProxyType::Vless => "vless",
            ProxyType::Trojan => "trojan",
            ProxyType::Hysteria => "hysteria",
            ProxyType::Hysteria2 => "hysteria2",
            ProxyType::Http => "http",
            ProxyType::Socks5 => "socks5",
        }
    }

    /// Placeholder display name used when a source carries no name.
    pub fn default_name(self) -> &'static str {
        match self {
            ProxyType::Shadowsocks => "SS",
            ProxyType::ShadowsocksR => "SSR",
            ProxyType::VMess => "VMess",
            ProxyType::Vless => "VLESS",
            ProxyType::Trojan => "Trojan",
            ProxyType::Hysteria => "Hysteria",
            ProxyType::Hysteria2 => "Hysteria2",
            ProxyType::Http => "HTTP",
            ProxyType::Socks5 => "SOCKS5",
        }
    }

    /// Resolves a Clash-style type tag. Matching is case-insensitive and
    /// accepts the common aliases `socks` and `hy2`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "ss" => Some(ProxyType::Shadowsocks),
            "ssr" => Some(ProxyType::ShadowsocksR),
            "vmess" => Some(ProxyType::VMess),
            "vless" => Some(ProxyType::Vless),
            "trojan" => Some(ProxyType::Trojan),
            "hysteria" => Some(ProxyType::Hysteria),
            "hysteria2" | "hy2" => Some(ProxyType::Hysteria2),
            "http" => Some(ProxyType::Http),
            "socks5" | "socks" => Some(ProxyType::Socks5),
            _ => None,
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProxyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProxyType::from_tag(s).ok_or_else(|| format!("unknown proxy type: {}", s))
    }
}

/// Protocol-specific part of a proxy. The variant fixes the proxy type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxySettings {
    Shadowsocks(ShadowsocksSettings),
    ShadowsocksR(ShadowsocksRSettings),
    VMess(VMessSettings),
    Vless(VlessSettings),
    Trojan(TrojanSettings),
    Hysteria(HysteriaSettings),
    Hysteria2(Hysteria2Settings),
    Http(HttpSettings),
    Socks5(Socks5Settings),
}

impl ProxySettings {
    pub fn proxy_type(&self) -> ProxyType {
        match self {
            ProxySettings::Shadowsocks(_) => ProxyType::Shadowsocks,
            ProxySettings::ShadowsocksR(_) => ProxyType::ShadowsocksR,
            ProxySettings::VMess(_) => ProxyType::VMess,
            ProxySettings::Vless(_) => ProxyType::Vless,
            ProxySettings::Trojan(_) => ProxyType::Trojan,
            ProxySettings::Hysteria(_) => ProxyType::Hysteria,
            ProxySettings::Hysteria2(_) => ProxyType::Hysteria2,
            ProxySettings::Http(_) => ProxyType::Http,
            ProxySettings::Socks5(_) => ProxyType::Socks5,
        }
    }
}

/// Represents a proxy configuration.
///
/// `name`, `server` and `port` are shared by every protocol; everything
/// else lives in [`ProxySettings`]. The settings are only reachable through
/// a shared reference so the proxy type cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    pub name: String,
    pub server: String,
    pub port: u16,
    settings: ProxySettings,
}

impl Proxy {
    pub fn new(
        name: impl Into<String>,
        server: impl Into<String>,
        port: u16,
        settings: ProxySettings,
    ) -> Self {
        Proxy {
            name: name.into(),
            server: server.into(),
            port,
            settings,
        }
    }

    pub fn proxy_type(&self) -> ProxyType {
        self.settings.proxy_type()
    }

    pub fn settings(&self) -> &ProxySettings {
        &self.settings
    }
}
