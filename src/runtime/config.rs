//! Relay configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the relay server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on. `0` picks a free port.
    pub port: u16,
    /// Path of the single prediction route.
    pub route: String,
    /// Absolute URL every prediction is POSTed to.
    pub upstream_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            route: "/predict".to_string(),
            upstream_url: "http://localhost:5000/predict".to_string(),
        }
    }
}

impl RelayConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the prediction route path.
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    /// Set the upstream URL.
    pub fn upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = url.into();
        self
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
