//! Hop-by-hop header filtering.
//!
//! One filter serves both legs of the proxy: client request headers before
//! dispatch and remote response headers before relay.

use axum::http::HeaderMap;

/// Headers that only make sense for a single connection, or that manage the
/// proxy itself. Never relayed in either direction.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "host",
    "proxy-connection",
    "connection",
    "keep-alive",
    "transfer-encoding",
    "te",
    "trailer",
    "proxy-authorization",
    "proxy-authenticate",
    "upgrade",
];

/// Returns true if `name` must not cross the proxy boundary.
pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| name.eq_ignore_ascii_case(h))
}

/// Copy every relayable entry of `headers` into a new map.
///
/// Multi-valued headers keep all their values in their original order.
pub fn filter_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if !is_hop_by_hop(name.as_str()) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    fn map(entries: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (k, v) in entries {
            headers.append(
                HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        headers
    }

    #[test]
    fn blocked_names_match_in_any_case() {
        for name in HOP_BY_HOP_HEADERS {
            assert!(is_hop_by_hop(name));
            assert!(is_hop_by_hop(&name.to_ascii_uppercase()));
        }
        assert!(is_hop_by_hop("Proxy-Connection"));
        assert!(is_hop_by_hop("tE"));
        assert!(!is_hop_by_hop("trailers"));
        assert!(!is_hop_by_hop("x-host"));
        assert!(!is_hop_by_hop("content-type"));
    }

    #[test]
    fn strips_blocked_and_keeps_the_rest() {
        let headers = map(&[
            ("Host", "localhost:8080"),
            ("Connection", "keep-alive"),
            ("Keep-Alive", "timeout=5"),
            ("Transfer-Encoding", "chunked"),
            ("TE", "trailers"),
            ("Trailer", "Expires"),
            ("Proxy-Authorization", "Basic Zm9v"),
            ("Proxy-Authenticate", "Basic"),
            ("Proxy-Connection", "keep-alive"),
            ("Upgrade", "websocket"),
            ("Accept", "application/json"),
            ("X-Requested-With", "XMLHttpRequest"),
        ]);

        let filtered = filter_headers(&headers);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered["accept"], "application/json");
        assert_eq!(filtered["x-requested-with"], "XMLHttpRequest");
    }

    #[test]
    fn keeps_every_value_of_multi_valued_headers() {
        let headers = map(&[
            ("set-cookie", "a=1"),
            ("connection", "close"),
            ("set-cookie", "b=2"),
        ]);

        let filtered = filter_headers(&headers);
        let cookies: Vec<_> = filtered.get_all("set-cookie").iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert!(!filtered.contains_key("connection"));
    }

    #[test]
    fn filtering_is_idempotent() {
        let headers = map(&[
            ("upgrade", "h2c"),
            ("content-type", "text/plain"),
            ("x-a", "1"),
            ("x-a", "2"),
        ]);

        let once = filter_headers(&headers);
        let twice = filter_headers(&once);
        assert_eq!(once, twice);
    }
}
