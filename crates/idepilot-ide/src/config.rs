//! Debug-port endpoint configuration

use serde::{Deserialize, Serialize};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 9222;

/// Where the IDE exposes its remote-debugging endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugPortConfig {
    pub host: String,
    pub port: u16,
}

impl DebugPortConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for DebugPortConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_the_local_debug_port() {
        let config = DebugPortConfig::default();
        assert_eq!(config.base_url(), "http://127.0.0.1:9222");
    }

    #[test]
    fn base_url_uses_configured_endpoint() {
        let config = DebugPortConfig::new("localhost", 9333);
        assert_eq!(config.base_url(), "http://localhost:9333");
    }
}
