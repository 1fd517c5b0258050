//! Convert proxy share-links, Clash YAML, sing-box JSON and Loon
//! configurations into each other.
//!
//! ```rust
//! use proxyconv::{Converter, FormatRegistry, ProxyType};
//!
//! let registry = FormatRegistry::with_defaults().unwrap();
//! let input = "ss://YWVzLTEyOC1nY206QzVNZUQ2RnQzQ1dsSklkQDE5OC41Ny4yNy4yMTg6NTAwNA==#test\n\
//!              vless://b831381d-6324-4d53-ad4f-8cda48b30811@v.example.com:443?security=tls#v";
//! let result = Converter::new(&registry)
//!     .convert(input, "txt", "clash-premium")
//!     .unwrap();
//! assert_eq!(result.kept, 1);
//! assert_eq!(result.dropped.get(&ProxyType::Vless), Some(&1));
//! ```

pub mod error;
pub mod fetch;
pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod settings;
pub mod utils;

pub use error::{ConvertError, Result};
pub use fetch::SubscriptionFetcher;
#[cfg(feature = "fetch")]
pub use fetch::HttpFetcher;
pub use interfaces::{Converter, Format, FormatRegistry, ProxyGenerator, ProxyParser};
pub use models::{ConversionResult, ParseOutcome, Proxy, ProxySettings, ProxyType};
pub use settings::Settings;
