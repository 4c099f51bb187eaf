//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream proxy is a usable absolute URL
//! - Validate value ranges (body limit > 0, metrics address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("upstream proxy `{0}` is not an absolute http(s) URL")]
    InvalidUpstreamProxy(String),

    #[error("bypass host entry {0} is empty")]
    EmptyBypassHost(usize),

    #[error("max_request_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("metrics address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(upstream) = &config.proxy.upstream_proxy {
        if parse_upstream_proxy(upstream).is_none() {
            errors.push(ValidationError::InvalidUpstreamProxy(upstream.clone()));
        }
    }

    for (i, host) in config.proxy.bypass_hosts.iter().enumerate() {
        if host.trim().is_empty() {
            errors.push(ValidationError::EmptyBypassHost(i));
        }
    }

    if config.proxy.max_request_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse an upstream proxy endpoint, accepting only http(s) URLs with a host.
pub fn parse_upstream_proxy(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    let scheme_ok = matches!(url.scheme(), "http" | "https");
    (scheme_ok && url.has_host()).then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ServerConfig::default();
        config.proxy.upstream_proxy = Some("proxy:8000".into());
        config.proxy.bypass_hosts = vec!["ok".into(), " ".into()];
        config.proxy.max_request_body_bytes = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidUpstreamProxy("proxy:8000".into()),
                ValidationError::EmptyBypassHost(1),
                ValidationError::ZeroBodyLimit,
                ValidationError::InvalidMetricsAddress("nowhere".into()),
            ]
        );
    }

    #[test]
    fn upstream_proxy_needs_http_scheme_and_host() {
        assert!(parse_upstream_proxy("http://proxy:8000").is_some());
        assert!(parse_upstream_proxy("https://proxy.corp").is_some());
        assert!(parse_upstream_proxy("ftp://proxy").is_none());
        assert!(parse_upstream_proxy("not a url").is_none());
    }
}
