//! Permissive CORS headers for every response.
//!
//! The headers are set only when the inner service did not already provide
//! them, so a relayed remote `Access-Control-*` header survives.

use axum::http::{header, HeaderValue};
use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept";

pub type CorsLayers = Stack<
    SetResponseHeaderLayer<HeaderValue>,
    Stack<SetResponseHeaderLayer<HeaderValue>, Identity>,
>;

/// Layers that stamp `Access-Control-Allow-Origin` and
/// `Access-Control-Allow-Headers` on every response.
pub fn cors_layers() -> ServiceBuilder<CorsLayers> {
    ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
}
