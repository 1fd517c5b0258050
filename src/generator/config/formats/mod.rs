pub mod clash;
pub mod loon;
pub mod singbox;
pub mod txt;

pub use clash::{ClashGenerator, CLASH_PREMIUM_PROTOCOLS};
pub use loon::{proxy_to_loon, LoonGenerator, LOON_PROTOCOLS};
pub use singbox::{SingBoxGenerator, SINGBOX_PROTOCOLS};
pub use txt::TxtGenerator;
