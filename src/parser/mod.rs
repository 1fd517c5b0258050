//! Input-side of the converter: share-links, Clash YAML and sing-box JSON
//! all end up as an ordered, name-de-duplicated list of proxies.

pub mod classifier;
pub mod explodes;
pub mod node_manip;
pub mod singbox;
pub mod subparser;
pub mod types;
pub mod yaml;

pub use classifier::{classify_subscription, ContentKind};
pub use node_manip::dedupe_names;
pub use singbox::parse_singbox_json;
pub use subparser::parse_multiple_proxies;
pub use types::ParsedBatch;
pub use yaml::clash::parse_clash_yaml;
