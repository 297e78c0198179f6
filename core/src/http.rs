//! Plain-data HTTP request and response types.
//!
//! # Design
//! The client builds an `HttpRequest` as data, hands it to a `Transport` for
//! the actual round-trip, and parses the returned `HttpResponse`. Keeping the
//! request as data lets unit tests inspect exactly what would go on the wire
//! without opening a socket.
//!
//! Bodies are raw bytes: Artifactory accepts JSON, plain text and binary
//! artifacts through the same verbs.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the encoded query string. Headers
/// keep insertion order; names are compared case-insensitively by `header`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First value of the named header, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response with its body fully read into memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/api".to_string(),
            headers: vec![("X-Result-Detail".to_string(), "info".to_string())],
            body: None,
        };
        assert_eq!(req.header("x-result-detail"), Some("info"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn success_range_is_inclusive() {
        let ok = |status| HttpResponse { status, body: Vec::new() }.is_success();
        assert!(ok(200));
        assert!(ok(299));
        assert!(!ok(199));
        assert!(!ok(300));
    }
}
