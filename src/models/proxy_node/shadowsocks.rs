#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowsocksSettings {
    pub cipher: String,
    pub password: String,
    pub udp: bool,
    /// SIP003 plugin name, e.g. `obfs-local` or `v2ray-plugin`.
    pub plugin: Option<String>,
    /// Plugin options in the format of `key1=value1;key2=value2`
    pub plugin_opts: Option<String>,
}

impl Default for ShadowsocksSettings {
    fn default() -> Self {
        ShadowsocksSettings {
            cipher: String::new(),
            password: String::new(),
            udp: true,
            plugin: None,
            plugin_opts: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadowsocksRSettings {
    /// Encryption method. The SSR `dummy` method is stored as `auto`.
    pub cipher: String,
    pub password: String,
    pub protocol: String,
    pub protocol_param: String,
    pub obfs: String,
    pub obfs_param: String,
    pub group: Option<String>,
}
