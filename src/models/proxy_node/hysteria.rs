/// Default upload bandwidth hint in Mbps.
pub const DEFAULT_UP_MBPS: u32 = 10;
/// Default download bandwidth hint in Mbps.
pub const DEFAULT_DOWN_MBPS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HysteriaSettings {
    pub auth: Option<String>,
    /// Underlying transport, `udp` unless the link says otherwise.
    pub protocol: String,
    pub skip_cert_verify: bool,
    pub sni: Option<String>,
    /// upload speed in Mbps
    pub up: u32,
    /// download speed in Mbps
    pub down: u32,
    pub alpn: Vec<String>,
    pub obfs: Option<String>,
}

impl Default for HysteriaSettings {
    fn default() -> Self {
        HysteriaSettings {
            auth: None,
            protocol: "udp".to_string(),
            skip_cert_verify: false,
            sni: None,
            up: DEFAULT_UP_MBPS,
            down: DEFAULT_DOWN_MBPS,
            alpn: Vec::new(),
            obfs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hysteria2Settings {
    pub password: String,
    pub skip_cert_verify: bool,
    pub sni: Option<String>,
    pub obfs: Option<String>,
    pub obfs_password: Option<String>,
}
