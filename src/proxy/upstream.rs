//! Upstream proxy selection.
//!
//! # Responsibilities
//! - Own the pooled client that chains through the upstream proxy
//! - Decide per request whether the fetch chains through the upstream proxy
//! - Honor the bypass host set (exact hostname match, case-insensitive)
//!
//! # Design Decisions
//! - Stateless: the decision is re-derived for every request
//! - Hostname only; the port of the target plays no part in bypass matching
//! - A chained route always carries its client, so there is no route without one

use reqwest::{Client, Proxy};
use url::Url;

use crate::config::{BypassHostSet, ProxySettings, UpstreamProxyConfig};
use crate::proxy::forwarder::client_builder;

/// A configured upstream proxy and the client that connects through it.
#[derive(Debug, Clone)]
pub struct UpstreamProxy {
    endpoint: Url,
    client: Client,
}

impl UpstreamProxy {
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// How a single outbound fetch is dispatched.
#[derive(Debug, Clone, Copy)]
pub enum Route<'a> {
    /// Connect to the target directly.
    Direct,
    /// Chain through the given upstream proxy.
    Upstream(&'a UpstreamProxy),
}

impl Route<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Route::Direct => "direct",
            Route::Upstream(_) => "upstream",
        }
    }
}

/// Chooses a [`Route`] from immutable startup configuration.
#[derive(Debug, Clone)]
pub struct UpstreamSelector {
    upstream: Option<UpstreamProxy>,
    bypass: BypassHostSet,
}

impl UpstreamSelector {
    /// Build the chaining client when an endpoint is configured. It never
    /// reads `HTTP_PROXY` and friends; only `config` decides.
    pub fn new(
        config: &UpstreamProxyConfig,
        bypass: BypassHostSet,
        settings: &ProxySettings,
    ) -> Result<Self, reqwest::Error> {
        let upstream = match config.endpoint() {
            Some(endpoint) => Some(UpstreamProxy {
                endpoint: endpoint.clone(),
                client: client_builder(settings)
                    .proxy(Proxy::all(endpoint.as_str())?)
                    .build()?,
            }),
            None => None,
        };

        Ok(Self { upstream, bypass })
    }

    pub fn upstream(&self) -> Option<&UpstreamProxy> {
        self.upstream.as_ref()
    }

    pub fn select(&self, target: &Url) -> Route<'_> {
        let Some(upstream) = &self.upstream else {
            return Route::Direct;
        };

        match target.host_str() {
            Some(host) if self.bypass.contains(host) => Route::Direct,
            _ => Route::Upstream(upstream),
        }
    }
}
