//! Host and client address extraction from HTTP request headers.

use axum::http::{HeaderMap, HeaderName, header};
use std::net::SocketAddr;

const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Extracts the request hostname, lower-cased and without a port.
///
/// Reads `X-Forwarded-Host` when `behind_proxy` is set (falling back to
/// `Host`), otherwise only `Host`. Handles:
/// - IPv4 addresses (e.g., `192.168.1.1`)
/// - IPv6 addresses (e.g., `[::1]`)
/// - Hostnames with ports (e.g., `example.com:3000`)
///
/// Returns `None` if no usable header is present.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "S.Example.com:8080".parse().unwrap());
///
/// assert_eq!(request_host(&headers, false).as_deref(), Some("s.example.com"));
/// ```
pub fn request_host(headers: &HeaderMap, behind_proxy: bool) -> Option<String> {
    let forwarded = behind_proxy
        .then(|| first_header_value(headers, &X_FORWARDED_HOST))
        .flatten();

    let host = match forwarded {
        Some(h) => h,
        None => headers.get(header::HOST)?.to_str().ok()?.trim(),
    };

    let host = strip_port(host);
    if host.is_empty() {
        return None;
    }

    Some(host.to_ascii_lowercase())
}

/// Resolves the client IP for the click ledger.
///
/// Uses the first `X-Forwarded-For` entry when `behind_proxy` is set,
/// otherwise the peer address of the connection.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> Option<String> {
    if behind_proxy && let Some(ip) = first_header_value(headers, &X_FORWARDED_FOR) {
        return Some(ip.to_string());
    }

    peer.map(|addr| addr.ip().to_string())
}

fn first_header_value<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 address (e.g., [::1] or [::1]:8080)
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_request_host_simple() {
        let h = headers(&[("host", "example.com")]);
        assert_eq!(request_host(&h, false).as_deref(), Some("example.com"));
    }

    #[test]
    fn test_request_host_strips_port_and_lowercases() {
        let h = headers(&[("host", "S.Example.COM:3000")]);
        assert_eq!(request_host(&h, false).as_deref(), Some("s.example.com"));
    }

    #[test]
    fn test_request_host_ip_addresses() {
        let h = headers(&[("host", "192.168.1.1:9000")]);
        assert_eq!(request_host(&h, false).as_deref(), Some("192.168.1.1"));

        let h = headers(&[("host", "[::1]:8080")]);
        assert_eq!(request_host(&h, false).as_deref(), Some("[::1]"));
    }

    #[test]
    fn test_request_host_missing() {
        assert_eq!(request_host(&HeaderMap::new(), false), None);
    }

    #[test]
    fn test_request_host_forwarded_only_behind_proxy() {
        let h = headers(&[("host", "internal:8080"), ("x-forwarded-host", "go.example.com, proxy")]);

        assert_eq!(request_host(&h, false).as_deref(), Some("internal"));
        assert_eq!(request_host(&h, true).as_deref(), Some("go.example.com"));
    }

    #[test]
    fn test_request_host_invalid_utf8() {
        let mut h = HeaderMap::new();
        if let Ok(v) = HeaderValue::from_bytes(&[0xFF, 0xFE, 0xFD]) {
            h.insert(header::HOST, v);
            assert_eq!(request_host(&h, false), None);
        }
    }

    #[test]
    fn test_client_ip_peer() {
        let peer: SocketAddr = "10.1.2.3:55000".parse().unwrap();
        let h = headers(&[("x-forwarded-for", "203.0.113.7")]);

        assert_eq!(client_ip(&h, Some(peer), false).as_deref(), Some("10.1.2.3"));
        assert_eq!(client_ip(&HeaderMap::new(), None, false), None);
    }

    #[test]
    fn test_client_ip_forwarded_first_entry() {
        let peer: SocketAddr = "10.1.2.3:55000".parse().unwrap();
        let h = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);

        assert_eq!(client_ip(&h, Some(peer), true).as_deref(), Some("203.0.113.7"));
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer), true).as_deref(), Some("10.1.2.3"));
    }
}
