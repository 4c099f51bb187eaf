//! Static asset serving from the working directory.
//!
//! # Data Flow
//! ```text
//! non-proxy request
//!     → CompressionLayer (optional; skips already-encoded responses)
//!     → gzip_sniff (tiles and tileset manifests only)
//!     → apply_mime_table (Content-Type for 3D formats)
//!     → ServeDir (files, index.html, ranges, conditional GETs)
//! ```

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::{compression::CompressionLayer, services::ServeDir};

use crate::config::StaticFilesConfig;
use crate::http::middleware::gzip::gzip_sniff;

/// Extension overrides on top of the default MIME guesses.
pub const MIME_TABLE: &[(&str, &str)] = &[
    ("mcj", "application/json"),
    ("czml", "application/json"),
    ("json", "application/json"),
    ("geojson", "application/json"),
    ("topojson", "application/json"),
    ("wasm", "application/wasm"),
    ("crn", "image/crn"),
    ("ktx", "image/ktx"),
    ("gltf", "model/gltf+json"),
    ("bgltf", "model/gltf-binary"),
    ("glb", "model/gltf-binary"),
    ("m3d", "application/octet-stream"),
    ("b3dm", "application/octet-stream"),
    ("pnts", "application/octet-stream"),
    ("i3dm", "application/octet-stream"),
    ("cmpt", "application/octet-stream"),
    ("geom", "application/octet-stream"),
    ("vctr", "application/octet-stream"),
    ("glsl", "text/plain"),
];

/// Content type for `path` from [`MIME_TABLE`], compared case-insensitively.
pub fn mime_for_path(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?;
    MIME_TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

/// Router serving every path below `config.root`.
pub fn static_router(config: &StaticFilesConfig) -> Router {
    let root = Arc::new(config.root.clone());

    let router = Router::new()
        .fallback_service(ServeDir::new(&config.root))
        .layer(middleware::from_fn(apply_mime_table))
        .layer(middleware::from_fn_with_state(root, gzip_sniff));

    if config.compression {
        router.layer(CompressionLayer::new())
    } else {
        router
    }
}

async fn apply_mime_table(request: Request, next: Next) -> Response {
    let mime = mime_for_path(request.uri().path());
    let mut response = next.run(request).await;

    if let Some(mime) = mime {
        if response.status().is_success() {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
        }
    }
    response
}
