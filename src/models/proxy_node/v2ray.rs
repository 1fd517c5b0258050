use super::transport::{GrpcOptions, RealityOptions, WsOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VMessSettings {
    pub uuid: String,
    pub alter_id: u32,
    pub cipher: String,
    /// Transport name: `tcp`, `ws`, `grpc`, ...
    pub network: String,
    pub tls: bool,
    pub skip_cert_verify: bool,
    pub servername: Option<String>,
    pub ws_opts: Option<WsOptions>,
    pub grpc_opts: Option<GrpcOptions>,
}

impl Default for VMessSettings {
    fn default() -> Self {
        VMessSettings {
            uuid: String::new(),
            alter_id: 0,
            cipher: "auto".to_string(),
            network: "tcp".to_string(),
            tls: false,
            skip_cert_verify: false,
            servername: None,
            ws_opts: None,
            grpc_opts: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlessSettings {
    pub uuid: String,
    pub network: String,
    pub tls: bool,
    pub servername: Option<String>,
    pub flow: Option<String>,
    pub skip_cert_verify: bool,
    pub reality_opts: Option<RealityOptions>,
    pub client_fingerprint: Option<String>,
    pub ws_opts: Option<WsOptions>,
    pub grpc_opts: Option<GrpcOptions>,
}

impl Default for VlessSettings {
    fn default() -> Self {
        VlessSettings {
            uuid: String::new(),
            network: "tcp".to_string(),
            tls: false,
            servername: None,
            flow: None,
            skip_cert_verify: false,
            reality_opts: None,
            client_fingerprint: None,
            ws_opts: None,
            grpc_opts: None,
        }
    }
}
