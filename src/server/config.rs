//! Gateway configuration

use std::net::SocketAddr;
use std::time::Duration;

/// Heartbeat cadence keeping idle connections alive through proxies
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);

/// Gateway configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Interval between heartbeat frames on an open session
    pub heartbeat_interval: Duration,

    /// Local development origins that get CORS echo headers
    ///
    /// Cross-origin requests from any other origin receive no CORS
    /// headers and are blocked by the browser.
    pub dev_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            dev_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the heartbeat interval
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Replace the recognized development origins
    pub fn dev_origins(mut self, origins: Vec<String>) -> Self {
        self.dev_origins = origins;
        self
    }

    /// Add one recognized development origin
    pub fn add_dev_origin(mut self, origin: impl Into<String>) -> Self {
        self.dev_origins.push(origin.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(25));
        assert!(config
            .dev_origins
            .contains(&"http://localhost:5173".to_string()));
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr, addr);
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:8081".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .heartbeat_interval(Duration::from_secs(10))
            .dev_origins(vec![])
            .add_dev_origin("http://localhost:3000");

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(10));
        assert_eq!(config.dev_origins, vec!["http://localhost:3000"]);
    }
}
