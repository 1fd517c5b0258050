/// WebSocket transport options (`ws-opts`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsOptions {
    pub path: String,
    /// Value of the `Host` header.
    pub host: Option<String>,
}

impl Default for WsOptions {
    fn default() -> Self {
        WsOptions {
            path: "/".to_string(),
            host: None,
        }
    }
}

/// gRPC transport options (`grpc-opts`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrpcOptions {
    pub service_name: String,
}

/// REALITY handshake options (`reality-opts`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RealityOptions {
    pub public_key: String,
    pub short_id: Option<String>,
}
