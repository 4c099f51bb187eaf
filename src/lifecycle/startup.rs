//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listener, explaining the common failures
//! - Announce where the server can be reached

use std::io;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Bind the configured address, logging a hint for well-known failures.
pub async fn bind_listener(config: &ListenerConfig) -> io::Result<TcpListener> {
    let addr = config.bind_address();
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(e) => {
            for hint in bind_error_hints(&e, config.port) {
                tracing::error!("{hint}");
            }
            Err(e)
        }
    }
}

/// Human-readable advice for a failed bind on `port`.
pub fn bind_error_hints(error: &io::Error, port: u16) -> Vec<String> {
    match error.kind() {
        io::ErrorKind::AddrInUse => vec![
            format!("Error: Port {port} is already in use, select a different port."),
            format!("Example: tileserve --port {}", port.saturating_add(1)),
        ],
        io::ErrorKind::PermissionDenied => {
            let mut hints = vec![format!(
                "Error: This process does not have permission to listen on port {port}."
            )];
            if port < 1024 {
                hints.push("Try a port number higher than 1024.".to_string());
            }
            hints
        }
        _ => Vec::new(),
    }
}

/// Log the address clients should connect to.
pub fn announce(addr: SocketAddr, public: bool) {
    let mode = if public { "publicly" } else { "locally" };
    tracing::info!(
        address = %addr,
        "Development server running {mode}. Connect to http://localhost:{}/",
        addr.port()
    );
}
