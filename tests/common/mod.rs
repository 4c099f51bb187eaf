//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::RawQuery,
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;

use tileserve::config::ServerConfig;
use tileserve::{HttpServer, Shutdown};

/// Body returned by the `/fixed` route, deliberately not valid UTF-8.
pub const FIXED_BODY: &[u8] = &[0x00, 0x9f, 0x92, 0x96, 0x1f, 0x8b, 0x08, 0xff];

/// Serve `router` on an ephemeral loopback port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start a remote that exposes:
/// - `/echo`: request headers as a JSON object
/// - `/fixed`: status 418, a few headers, [`FIXED_BODY`]
/// - `/missing`: status 404, body `nope`
/// - `/query`: the raw query string
/// - `/body`: the request body
/// - `/redirect`: status 302 pointing at `/missing`
/// - `/cors`: its own `Access-Control-Allow-Origin`
pub async fn start_remote() -> SocketAddr {
    let router = Router::new()
        .route("/echo", any(echo_headers))
        .route("/fixed", get(fixed))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }))
        .route(
            "/query",
            get(|RawQuery(query): RawQuery| async move { query.unwrap_or_default() }),
        )
        .route("/body", any(|body: Bytes| async move { body }))
        .route(
            "/redirect",
            get(|| async { (StatusCode::FOUND, [("location", "/missing")]) }),
        )
        .route(
            "/cors",
            get(|| async { ([("access-control-allow-origin", "https://a.example")], "cors") }),
        );
    serve(router).await
}

async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let map = headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    Json(map)
}

async fn fixed() -> impl IntoResponse {
    (
        StatusCode::IM_A_TEAPOT,
        [
            ("x-remote", "teapot"),
            ("proxy-authenticate", "Basic realm=\"upstream\""),
            ("content-type", "application/octet-stream"),
        ],
        FIXED_BODY,
    )
}

/// A stand-in HTTP proxy: records each absolute-form target it receives and
/// answers `via-upstream` without contacting anything.
pub async fn start_upstream_proxy() -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let router = Router::new().fallback(move |uri: Uri| {
        let recorder = recorder.clone();
        async move {
            recorder.lock().unwrap().push(uri.to_string());
            "via-upstream"
        }
    });
    (serve(router).await, seen)
}

/// Start the development server with `config` on an ephemeral port.
pub async fn start_server(config: ServerConfig) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    (addr, shutdown)
}

/// A client that never picks up proxies from the environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Like [`client`], but hands 3xx responses back instead of following them.
pub fn client_without_redirects() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
