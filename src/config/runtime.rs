//! Runtime views of the proxy configuration.
//!
//! Built once at startup from [`ProxySettings`] and never mutated afterwards;
//! request handlers only ever see them behind an `Arc`.

use std::collections::HashSet;

use url::Url;

use crate::config::schema::ProxySettings;
use crate::config::validation::parse_upstream_proxy;

/// Optional secondary proxy that outbound fetches chain through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamProxyConfig {
    endpoint: Option<Url>,
}

impl UpstreamProxyConfig {
    pub fn new(endpoint: Option<Url>) -> Self {
        Self { endpoint }
    }

    /// Parses the configured endpoint. Invalid endpoints were already
    /// rejected by validation, so an unparseable value here means "none".
    pub fn from_settings(settings: &ProxySettings) -> Self {
        Self::new(settings.upstream_proxy.as_deref().and_then(parse_upstream_proxy))
    }

    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }
}

/// Hostnames that skip the upstream proxy. Exact, case-insensitive match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BypassHostSet {
    hosts: HashSet<String>,
}

impl BypassHostSet {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = hosts
            .into_iter()
            .map(|h| h.as_ref().trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        Self { hosts }
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(&host.to_ascii_lowercase())
    }
}
