//! Passthrough proxy subsystem.
//!
//! # Data Flow
//! ```text
//! GET /proxy/<target>  or  GET /proxy/?<encoded-url>
//!     → resolver.rs (path form, then query form)
//!     → headers.rs (strip hop-by-hop, request leg)
//!     → upstream.rs (direct or via upstream proxy)
//!     → forwarder.rs (single fetch, awaited to completion)
//!     → headers.rs (strip hop-by-hop, response leg)
//!     → client receives remote status + headers + exact bytes
//! ```
//!
//! # Design Decisions
//! - No caching, no content rewriting
//! - No shared mutable state: every request is independent

pub mod error;
pub mod forwarder;
pub mod headers;
pub mod resolver;
pub mod service;
pub mod upstream;

pub use error::ProxyError;
pub use forwarder::{Forwarder, ProxyRequest, ProxyResponse};
pub use headers::filter_headers;
pub use resolver::{resolve_target, resolve_uri, Resolution, PROXY_PREFIX};
pub use service::ProxyService;
pub use upstream::{Route, UpstreamProxy, UpstreamSelector};
