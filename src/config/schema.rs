//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the development server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (port, interface).
    pub listener: ListenerConfig,

    /// Passthrough proxy settings.
    pub proxy: ProxySettings,

    /// Static asset serving.
    pub static_files: StaticFilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Port to listen on.
    pub port: u16,

    /// Listen on all interfaces instead of loopback only.
    pub public: bool,
}

impl ListenerConfig {
    /// Socket address derived from `port` and `public`.
    pub fn bind_address(&self) -> SocketAddr {
        let ip = if self.public {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        };
        SocketAddr::new(ip, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            public: false,
        }
    }
}

/// Settings for the `/proxy/` route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Standard proxy used to retrieve remote data, e.g. `http://proxy:8000`.
    pub upstream_proxy: Option<String>,

    /// Hosts that connect directly even when `upstream_proxy` is set.
    pub bypass_hosts: Vec<String>,

    /// Follow remote redirects instead of relaying the 3xx.
    pub follow_redirects: bool,

    /// Largest request body accepted for forwarding.
    pub max_request_body_bytes: usize,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            upstream_proxy: None,
            bypass_hosts: Vec::new(),
            follow_redirects: true,
            max_request_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Static file serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory served for every non-proxy path.
    pub root: PathBuf,

    /// Negotiate response compression for static assets.
    pub compression: bool,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            compression: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`.
    pub log_filter: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "tileserve=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
