//! Debug logging of outgoing requests.
//!
//! # Design
//! The client never looks at the environment to decide whether to log. A
//! `RequestLogger` is attached at construction (see
//! `ArtifactoryClient::with_logger`) and sees every request just before it is
//! handed to the transport.

use crate::http::HttpRequest;

/// Receives each built request before it is sent.
pub trait RequestLogger: Send + Sync {
    fn log_request(&self, request: &HttpRequest);
}

/// Logs the header set and body of every request as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RequestLogger for TracingLogger {
    fn log_request(&self, request: &HttpRequest) {
        let body = request
            .body
            .as_deref()
            .map(String::from_utf8_lossy)
            .unwrap_or_default();
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            headers = ?request.headers,
            body = %body,
            "artifactory request"
        );
    }
}

impl<F> RequestLogger for F
where
    F: Fn(&HttpRequest) + Send + Sync,
{
    fn log_request(&self, request: &HttpRequest) {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn tracing_logger_emits_headers_and_body() {
        let request = HttpRequest {
            method: HttpMethod::Put,
            url: "http://localhost:8081/artifactory/api/repositories/libs".to_string(),
            headers: vec![("X-Result-Detail".to_string(), "info, properties".to_string())],
            body: Some(b"{\"rclass\":\"local\"}".to_vec()),
        };
        TracingLogger.log_request(&request);

        assert!(logs_contain("artifactory request"));
        assert!(logs_contain("X-Result-Detail"));
        assert!(logs_contain("rclass"));
    }
}
