//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags + optional TOML file
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated)
//!     → runtime.rs (UpstreamProxyConfig, BypassHostSet)
//!     → shared via Arc to every request handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod runtime;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use runtime::{BypassHostSet, UpstreamProxyConfig};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, ProxySettings, ServerConfig,
    StaticFilesConfig,
};
