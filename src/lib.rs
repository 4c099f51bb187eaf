//! Local development server: static assets plus an open passthrough proxy.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
