//! Format registry, input parsers and the conversion entry point.

pub mod converter;
pub mod parsers;
pub mod registry;

pub use converter::{partition_supported, Converter};
pub use parsers::{ClashParser, LinkParser, SingBoxParser, SubscribeUrlParser};
pub use registry::{Format, FormatRegistry, ProxyGenerator, ProxyParser};
