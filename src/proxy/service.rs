//! The proxy request pipeline.

use axum::body::Body;
use axum::http::request::Parts;

use crate::config::{BypassHostSet, ProxySettings, UpstreamProxyConfig};
use crate::proxy::error::ProxyError;
use crate::proxy::forwarder::{Forwarder, ProxyRequest, ProxyResponse};
use crate::proxy::headers::filter_headers;
use crate::proxy::resolver::resolve_uri;
use crate::proxy::upstream::UpstreamSelector;

/// Resolve → filter → select → forward, for one request at a time.
///
/// Holds only read-only state; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ProxyService {
    selector: UpstreamSelector,
    forwarder: Forwarder,
    max_body_bytes: usize,
}

impl ProxyService {
    pub fn new(settings: &ProxySettings) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamProxyConfig::from_settings(settings);
        let bypass = BypassHostSet::new(&settings.bypass_hosts);

        Ok(Self {
            selector: UpstreamSelector::new(&upstream, bypass, settings)?,
            forwarder: Forwarder::new(settings)?,
            max_body_bytes: settings.max_request_body_bytes,
        })
    }

    pub fn selector(&self) -> &UpstreamSelector {
        &self.selector
    }

    pub async fn handle(&self, parts: Parts, body: Body) -> Result<ProxyResponse, ProxyError> {
        let target = resolve_uri(&parts.uri).into_result()?;
        let headers = filter_headers(&parts.headers);

        let body = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(ProxyError::RequestBody)?;
        let body = (!body.is_empty()).then_some(body);

        let route = self.selector.select(&target);
        tracing::debug!(
            method = %parts.method,
            target = %target,
            route = route.label(),
            "Forwarding proxy request"
        );

        let request = ProxyRequest {
            method: parts.method,
            target,
            headers,
            body,
        };
        self.forwarder.forward(request, route).await
    }
}
