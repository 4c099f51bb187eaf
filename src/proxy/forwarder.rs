//! Outbound fetch and verbatim relay.
//!
//! # Responsibilities
//! - Own the pooled direct client; chained routes bring their own
//! - Execute exactly one fetch per proxied request
//! - Hand back the remote status, filtered headers and exact body bytes
//!
//! # Design Decisions
//! - Clients are built once and shared; never recreated per call
//! - No automatic decompression: the client is built without decoders, so
//!   body bytes and `Content-Encoding` reach the client untouched
//! - Remote 4xx/5xx are data; only a missing response is an error
//! - No retries, no timeouts: a hanging remote stalls only its own request

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::{redirect, Client};
use url::Url;

use crate::config::ProxySettings;
use crate::proxy::error::ProxyError;
use crate::proxy::headers::filter_headers;
use crate::proxy::upstream::Route;

/// A request ready for dispatch. Headers are already filtered.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    pub target: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// A fully received remote response. Headers are already filtered.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Executes outbound fetches over shared, connection-pooled clients.
#[derive(Debug, Clone)]
pub struct Forwarder {
    direct: Client,
}

impl Forwarder {
    /// Build the direct client. It ignores `HTTP_PROXY` and friends;
    /// chaining only ever happens through the configured upstream.
    pub fn new(settings: &ProxySettings) -> Result<Self, reqwest::Error> {
        let direct = client_builder(settings).no_proxy().build()?;
        Ok(Self { direct })
    }

    /// Fetch `request` over `route` and wait for the complete response.
    pub async fn forward(
        &self,
        request: ProxyRequest,
        route: Route<'_>,
    ) -> Result<ProxyResponse, ProxyError> {
        let client = match route {
            Route::Direct => &self.direct,
            Route::Upstream(upstream) => upstream.client(),
        };

        let mut outbound = client
            .request(request.method, request.target)
            .headers(request.headers);
        if let Some(body) = request.body {
            outbound = outbound.body(body);
        }

        let response = outbound.send().await?;
        let status = response.status();
        let headers = filter_headers(response.headers());
        let body = response.bytes().await?;

        Ok(ProxyResponse {
            status,
            headers,
            body,
        })
    }
}

pub(crate) fn client_builder(settings: &ProxySettings) -> reqwest::ClientBuilder {
    let policy = if settings.follow_redirects {
        redirect::Policy::default()
    } else {
        redirect::Policy::none()
    };
    Client::builder().redirect(policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relays_status_headers_and_body() {
        let mut headers = HeaderMap::new();
        headers.insert("x-remote", "1".parse().unwrap());
        let response = ProxyResponse {
            status: StatusCode::IM_A_TEAPOT,
            headers,
            body: Bytes::from_static(&[0x1f, 0x8b, 0x08, 0x00]),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers()["x-remote"], "1");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], &[0x1f, 0x8b, 0x08, 0x00]);
    }
}
