//! Remote target resolution.
//!
//! # Addressing conventions
//! ```text
//! path form:  /proxy/example.com/file.json?foo=1
//!             → http://example.com/file.json?foo=1
//! query form: /proxy/?http%3A%2F%2Fexample.com%2Ffile.json%3Ffoo%3D1
//!             → http://example.com/file.json?foo=1
//! ```
//!
//! # Design Decisions
//! - Path form wins; query form is only consulted when the path is empty
//! - Path form always takes the outer request's query string, replacing any
//!   query embedded in the path segment
//! - Query form keeps the query embedded in the encoded URL
//! - A target without a scheme is fetched over plain `http`

use std::borrow::Cow;

use axum::http::Uri;
use url::{form_urlencoded, Url};

use crate::proxy::error::ProxyError;

/// Route prefix under which the proxy is mounted.
pub const PROXY_PREFIX: &str = "/proxy/";

/// Outcome of resolving a proxy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Url),
    Unresolved,
}

impl Resolution {
    pub fn into_result(self) -> Result<Url, ProxyError> {
        match self {
            Resolution::Resolved(url) => Ok(url),
            Resolution::Unresolved => Err(ProxyError::NoTargetSpecified),
        }
    }
}

/// Resolve the forwarding target of an incoming `/proxy/...` request URI.
pub fn resolve_uri(uri: &Uri) -> Resolution {
    let raw = uri.path().strip_prefix(PROXY_PREFIX).unwrap_or("");
    let candidate = urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw));
    resolve_target(&candidate, uri.query())
}

/// Resolve from an already-decoded path candidate and the outer query string.
pub fn resolve_target(path_candidate: &str, outer_query: Option<&str>) -> Resolution {
    if !path_candidate.is_empty() {
        return resolve_path_form(path_candidate, outer_query);
    }

    match first_query_key(outer_query) {
        Some(key) => resolve_query_form(&key),
        None => Resolution::Unresolved,
    }
}

fn resolve_path_form(candidate: &str, outer_query: Option<&str>) -> Resolution {
    let with_scheme = if has_http_scheme(candidate) {
        Cow::Borrowed(candidate)
    } else {
        Cow::Owned(format!("http://{candidate}"))
    };

    match Url::parse(&with_scheme) {
        Ok(mut url) if url.has_host() => {
            url.set_query(outer_query);
            Resolution::Resolved(url)
        }
        _ => Resolution::Unresolved,
    }
}

fn resolve_query_form(candidate: &str) -> Resolution {
    // `localhost:8080/x` parses with `localhost` as its scheme and no host,
    // so anything hostless gets a second attempt with `http://` in front.
    if let Ok(url) = Url::parse(candidate) {
        if url.has_host() {
            return Resolution::Resolved(url);
        }
    }
    match Url::parse(&format!("http://{candidate}")) {
        Ok(url) if url.has_host() => Resolution::Resolved(url),
        _ => Resolution::Unresolved,
    }
}

fn has_http_scheme(candidate: &str) -> bool {
    let starts_with = |prefix: &str| {
        candidate
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    starts_with("http://") || starts_with("https://")
}

/// Name of the first query parameter, decoded. `?a=1&b=2` yields `a`.
fn first_query_key(query: Option<&str>) -> Option<String> {
    let (key, _) = form_urlencoded::parse(query?.as_bytes()).next()?;
    (!key.is_empty()).then(|| key.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(uri: &str) -> Resolution {
        resolve_uri(&uri.parse::<Uri>().unwrap())
    }

    fn resolved(uri: &str) -> Url {
        match resolve(uri) {
            Resolution::Resolved(url) => url,
            Resolution::Unresolved => panic!("{uri} did not resolve"),
        }
    }

    #[test]
    fn path_form_defaults_to_http() {
        let url = resolved("/proxy/example.com/data.json?foo=1");
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/data.json");
        assert_eq!(url.query(), Some("foo=1"));
    }

    #[test]
    fn path_form_keeps_explicit_scheme() {
        let url = resolved("/proxy/https://example.com:8443/tiles/0/0/0.b3dm");
        assert_eq!(url.as_str(), "https://example.com:8443/tiles/0/0/0.b3dm");

        let url = resolved("/proxy/HTTP://example.com/a");
        assert_eq!(url.as_str(), "http://example.com/a");
    }

    #[test]
    fn path_form_outer_query_replaces_embedded_query() {
        let url = resolved("/proxy/example.com/a%3Fembedded%3D1?foo=1");
        assert_eq!(url.query(), Some("foo=1"));

        let url = resolved("/proxy/example.com/a%3Fembedded%3D1");
        assert_eq!(url.query(), None);
        assert_eq!(url.as_str(), "http://example.com/a");
    }

    #[test]
    fn path_form_decodes_the_segment() {
        let url = resolved("/proxy/http%3A%2F%2Fexample.com%2Fdata.json");
        assert_eq!(url.as_str(), "http://example.com/data.json");
    }

    #[test]
    fn query_form_keeps_embedded_query() {
        let url = resolved("/proxy/?http%3A%2F%2Fexample.com%2Fdata.json%3Ffoo%3D1");
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/data.json");
        assert_eq!(url.query(), Some("foo=1"));
    }

    #[test]
    fn query_form_uses_only_the_first_key() {
        let url = resolved("/proxy/?https%3A%2F%2Fa.example%2Fx&http%3A%2F%2Fb.example%2F");
        assert_eq!(url.as_str(), "https://a.example/x");
    }

    #[test]
    fn query_form_defaults_to_http() {
        let url = resolved("/proxy/?example.com%2Fdata.json");
        assert_eq!(url.as_str(), "http://example.com/data.json");

        let url = resolved("/proxy/?localhost%3A9000%2Fx");
        assert_eq!(url.as_str(), "http://localhost:9000/x");
    }

    #[test]
    fn nothing_to_resolve() {
        assert_eq!(resolve("/proxy/"), Resolution::Unresolved);
        assert_eq!(resolve("/proxy/?"), Resolution::Unresolved);
        assert_eq!(resolve("/proxy/?=value"), Resolution::Unresolved);
        assert!(matches!(
            resolve("/proxy/").into_result(),
            Err(ProxyError::NoTargetSpecified)
        ));
    }

    #[test]
    fn unparseable_path_form_does_not_fall_back_to_query() {
        assert_eq!(
            resolve_target("exa mple.com/x", Some("http%3A%2F%2Fexample.com")),
            Resolution::Unresolved
        );
    }
}
