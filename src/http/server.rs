//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, CORS)
//! - Dispatch `/proxy/` requests to the proxy pipeline
//! - Fall back to static file serving for every other path
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::middleware::cors::cors_layers;
use crate::http::static_files::static_router;
use crate::observability::metrics;
use crate::proxy::{ProxyError, ProxyService};

/// Errors that stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to build outbound client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ProxyService>,
}

/// HTTP server for the development host.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let proxy = Arc::new(ProxyService::new(&config.proxy)?);

        if let Some(upstream) = proxy.selector().upstream() {
            tracing::info!(
                upstream = %upstream.endpoint(),
                bypass_hosts = ?config.proxy.bypass_hosts,
                "Chaining proxy requests through upstream proxy"
            );
        }

        let router = Self::build_router(&config, AppState { proxy });
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/proxy/", any(proxy_handler))
            .route("/proxy/{*target}", any(proxy_handler))
            .with_state(state)
            .fallback_service(static_router(&config.static_files))
            .layer(cors_layers())
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.config.static_files.root.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Proxy handler: resolves, forwards and relays a single request.
async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();

    match state.proxy.handle(parts, body).await {
        Ok(relayed) => {
            tracing::debug!(path = %path, status = %relayed.status, "Relayed remote response");
            metrics::record_proxy_request(relayed.status.as_u16(), "relayed", start);
            relayed.into_response()
        }
        Err(e) => {
            let outcome = match &e {
                ProxyError::Transport(_) => {
                    tracing::error!(path = %path, error = %e, "Proxy fetch failed");
                    "transport_error"
                }
                _ => {
                    tracing::warn!(path = %path, error = %e, "Proxy request rejected");
                    "rejected"
                }
            };
            metrics::record_proxy_request(e.status().as_u16(), outcome, start);
            e.into_response()
        }
    }
}
