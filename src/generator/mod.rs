//! Output side: per-protocol adapters, static templates and the format
//! generators built from them.

pub mod adapters;
pub mod config;
pub mod templates;

pub use adapters::{AdapterRegistry, ProxyAdapter};
pub use config::formats::{ClashGenerator, LoonGenerator, SingBoxGenerator, TxtGenerator};
