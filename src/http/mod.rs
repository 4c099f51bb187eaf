//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, TraceLayer)
//!     → middleware/cors.rs (CORS headers on every response)
//!     → /proxy/...  → proxy subsystem
//!     → anything else → static_files.rs
//!                         → middleware/gzip.rs (tile sniffing)
//!                         → ServeDir
//! ```

pub mod middleware;
pub mod server;
pub mod static_files;

pub use server::{AppState, HttpServer, ServerError};
