//! Server configuration.

use std::path::PathBuf;

/// Default bind address (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port, shared by static files and the WebSocket endpoint
pub const DEFAULT_PORT: u16 = 3000;
/// Default directory static assets are served from
pub const DEFAULT_PUBLIC_DIR: &str = "./public";

/// Runtime configuration of the relay server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,
    /// Port number to bind to (e.g., 3000)
    pub port: u16,
    /// Directory served for every non-WebSocket request
    pub public_dir: PathBuf,
    /// Maximum number of simultaneous connections (`None` = unbounded)
    pub max_connections: Option<usize>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            max_connections: None,
        }
    }
}
