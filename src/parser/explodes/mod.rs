pub mod common;
pub mod http;
pub mod hysteria;
pub mod hysteria2;
pub mod socks;
pub mod ss;
pub mod ssr;
pub mod telegram;
pub mod trojan;
pub mod vless;
pub mod vmess;

pub use common::{explode, is_known_scheme, scheme_token, KNOWN_SCHEMES};
pub use http::explode_http;
pub use hysteria::explode_hysteria;
pub use hysteria2::explode_hysteria2;
pub use socks::explode_socks;
pub use ss::explode_ss;
pub use ssr::explode_ssr;
pub use telegram::explode_telegram;
pub use trojan::explode_trojan;
pub use vless::explode_vless;
pub use vmess::explode_vmess;
