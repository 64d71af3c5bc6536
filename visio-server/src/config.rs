use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Runtime settings of the signaling server. Every flag can also be supplied
/// through the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "visio-signaling", version, about = "WebRTC signaling and room chat relay")]
pub struct ServerConfig {
    /// Address to bind the WebSocket listener to.
    #[arg(long, env = "VISIO_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    #[arg(long, env = "VISIO_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Base URL of the CRUD service that stores chat messages.
    #[arg(long, env = "VISIO_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Per-request timeout for calls into the CRUD service.
    #[arg(long, env = "VISIO_API_TIMEOUT_MS", default_value_t = 5000)]
    pub api_timeout_ms: u64,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms)
    }
}
