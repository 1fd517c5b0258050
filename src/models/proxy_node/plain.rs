#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpSettings {
    pub username: Option<String>,
    pub password: Option<String>,
    pub tls: bool,
    pub skip_cert_verify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Socks5Settings {
    pub username: Option<String>,
    pub password: Option<String>,
    pub udp: bool,
}

impl Default for Socks5Settings {
    fn default() -> Self {
        Socks5Settings {
            username: None,
            password: None,
            udp: true,
        }
    }
}
