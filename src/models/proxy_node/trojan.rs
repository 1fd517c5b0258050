use super::transport::{GrpcOptions, WsOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrojanSettings {
    pub password: String,
    pub udp: bool,
    pub skip_cert_verify: bool,
    pub sni: Option<String>,
    pub network: String,
    pub ws_opts: Option<WsOptions>,
    pub grpc_opts: Option<GrpcOptions>,
}

impl Default for TrojanSettings {
    fn default() -> Self {
        TrojanSettings {
            password: String::new(),
            udp: true,
            skip_cert_verify: false,
            sni: None,
            network: "tcp".to_string(),
            ws_opts: None,
            grpc_opts: None,
        }
    }
}
