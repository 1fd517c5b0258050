//! Per-protocol settings carried by [`crate::models::Proxy`].

mod hysteria;
mod plain;
mod shadowsocks;
mod transport;
mod trojan;
mod v2ray;

pub use hysteria::{Hysteria2Settings, HysteriaSettings, DEFAULT_DOWN_MBPS, DEFAULT_UP_MBPS};
pub use plain::{HttpSettings, Socks5Settings};
pub use shadowsocks::{ShadowsocksRSettings, ShadowsocksSettings};
pub use transport::{GrpcOptions, RealityOptions, WsOptions};
pub use trojan::TrojanSettings;
pub use v2ray::{VMessSettings, VlessSettings};
