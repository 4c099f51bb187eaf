//! Proxy error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Body sent when no forwarding target can be found.
pub const NO_URL_MESSAGE: &str = "No url specified.";

/// Errors surfaced to the proxy client.
///
/// A remote response with an error status is not one of these; it is
/// relayed as data.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Neither the path nor the query named a parseable target.
    #[error("No url specified.")]
    NoTargetSpecified,

    /// The fetch produced no response at all.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The client's request body could not be buffered.
    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::NoTargetSpecified | ProxyError::RequestBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::NoTargetSpecified => (self.status(), NO_URL_MESSAGE).into_response(),
            ProxyError::Transport(_) => self.status().into_response(),
            ProxyError::RequestBody(_) => (self.status(), self.to_string()).into_response(),
        }
    }
}
