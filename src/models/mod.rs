//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the application,
//! separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use proxyconv::models::{Proxy, ProxySettings, ProxyType, TrojanSettings};
//!
//! let proxy = Proxy::new(
//!     "node",
//!     "example.com",
//!     443,
//!     ProxySettings::Trojan(TrojanSettings {
//!         password: "secret".to_string(),
//!         ..Default::default()
//!     }),
//! );
//! assert_eq!(proxy.proxy_type(), ProxyType::Trojan);
//! ```

mod proxy;
pub mod proxy_node;
mod result;

pub use proxy::*;
pub use proxy_node::*;
pub use result::*;
