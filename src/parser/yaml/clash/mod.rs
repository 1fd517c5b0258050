mod parsers;
mod proxy_types;
mod scanner;

pub use parsers::{explode_clash, parse_clash_yaml};
pub use proxy_types::{proxy_from_clash_map, ClashEntryError};
pub use scanner::{coerce_scalar, extract_proxy_maps, parse_flow_map};
