//! Request builder and dispatcher for the Artifactory REST API.
//!
//! # Design
//! Every verb goes through the same three steps: `build_request` turns a
//! path, options and optional body into an `HttpRequest`, the owned
//! `Transport` executes it, and `parse_response` classifies the
//! `HttpResponse`. Build and parse are public and free of I/O so callers can
//! drive their own transport if they need to.

use base64::Engine;
use sha1::{Digest, Sha1};
use url::Url;

use crate::config::{self, AuthMethod, ClientConfig};
use crate::error::{ClientError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::logging::{RequestLogger, TracingLogger};
use crate::options::RequestOptions;
use crate::transport::{Transport, UreqTransport};
use crate::types::ErrorPayload;

pub const USER_AGENT: &str = concat!("artifactory-go.", env!("CARGO_PKG_VERSION"));
pub const RESULT_DETAIL: &str = "info, properties";

pub const HEADER_CHECKSUM_SHA1: &str = "X-Checksum-Sha1";
pub const HEADER_RESULT_DETAIL: &str = "X-Result-Detail";
pub const HEADER_API_KEY: &str = "X-JFrog-Art-Api";

/// Client for an Artifactory instance.
///
/// Holds the configuration, a reusable transport and an optional debug
/// logger. No state is carried between calls.
pub struct ArtifactoryClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
    logger: Option<Box<dyn RequestLogger>>,
}

impl ArtifactoryClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Build a client from `ARTIFACTORY_*` variables. A non-empty
    /// `ARTIFACTORY_DEBUG` attaches a `TracingLogger`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let client = Self::new(ClientConfig::from_env()?);
        Ok(if config::debug_from_env() {
            client.with_logger(TracingLogger)
        } else {
            client
        })
    }
}

impl<T: Transport> ArtifactoryClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            logger: None,
        }
    }

    /// Attach a logger that sees every request before it is sent.
    pub fn with_logger(mut self, logger: impl RequestLogger + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, path: &str, options: &RequestOptions) -> Result<Vec<u8>, ClientError> {
        self.request(HttpMethod::Get, path, options, None)
    }

    pub fn post(
        &self,
        path: &str,
        data: &str,
        options: &RequestOptions,
    ) -> Result<Vec<u8>, ClientError> {
        self.request(HttpMethod::Post, path, options, Some(data.as_bytes().to_vec()))
    }

    /// PUT string data. Exactly one trailing newline is stripped.
    pub fn put(
        &self,
        path: &str,
        data: &str,
        options: &RequestOptions,
    ) -> Result<Vec<u8>, ClientError> {
        let data = data.strip_suffix('\n').unwrap_or(data);
        self.request(HttpMethod::Put, path, options, Some(data.as_bytes().to_vec()))
    }

    /// PUT a binary payload unchanged, e.g. an artifact deploy.
    pub fn put_bytes(
        &self,
        path: &str,
        data: &[u8],
        options: &RequestOptions,
    ) -> Result<Vec<u8>, ClientError> {
        self.request(HttpMethod::Put, path, options, Some(data.to_vec()))
    }

    pub fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.request(HttpMethod::Delete, path, &RequestOptions::new(), None)
            .map(|_| ())
    }

    fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, ClientError> {
        let request = self.build_request(method, path, options, body)?;
        if let Some(logger) = &self.logger {
            logger.log_request(&request);
        }
        tracing::trace!(method = %request.method, url = %request.url, "dispatching request");
        let response = self.transport.execute(&request)?;
        parse_response(response)
    }

    /// Build the request for `method` on `path` without sending it.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
        body: Option<Vec<u8>>,
    ) -> Result<HttpRequest, ClientError> {
        let url = build_url(&self.config.base_url, path, options)?;

        let mut headers = Vec::new();
        if let Some(body) = &body {
            headers.push((HEADER_CHECKSUM_SHA1.to_string(), sha1_hex(body)));
        }
        headers.push(("user-agent".to_string(), USER_AGENT.to_string()));
        headers.push((HEADER_RESULT_DETAIL.to_string(), RESULT_DETAIL.to_string()));
        if let Some(content_type) = options.content_type_value() {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
        headers.push(auth_header(&self.config.auth));

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

/// Classify a response: 2xx yields the body, anything else an error that
/// still carries the body.
pub fn parse_response(response: HttpResponse) -> Result<Vec<u8>, ClientError> {
    if response.is_success() {
        return Ok(response.body);
    }
    tracing::debug!(status = response.status, "non-2xx response");
    match parse_error_payload(&response.body) {
        Ok(payload) => Err(ClientError::Api {
            status: response.status,
            message: payload.joined_messages(),
            body: response.body,
        }),
        Err(e) => Err(ClientError::UnexpectedStatus {
            status: response.status,
            body: response.body,
            parse_error: e,
        }),
    }
}

/// Only a JSON object is an error list; serde would also accept the struct
/// written as an array.
fn parse_error_payload(body: &[u8]) -> Result<ErrorPayload, String> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("error body is not a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Join `path` onto `base_url` (one trailing slash dropped) and encode the
/// query options. The joined string is only validated, never normalised, so
/// dot segments and an empty path go out as written. A non-empty query
/// replaces any query already in `path`.
fn build_url(base_url: &str, path: &str, options: &RequestOptions) -> Result<String, url::ParseError> {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let joined = format!("{base}{path}");
    Url::parse(&joined)?;

    let query = options.query_params();
    if query.is_empty() {
        return Ok(joined);
    }
    let (target, fragment) = match joined.split_once('#') {
        Some((target, fragment)) => (target, Some(fragment)),
        None => (joined.as_str(), None),
    };
    let without_query = target.split_once('?').map_or(target, |(head, _)| head);
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query)
        .finish();
    Ok(match fragment {
        Some(fragment) => format!("{without_query}?{encoded}#{fragment}"),
        None => format!("{without_query}?{encoded}"),
    })
}

fn sha1_hex(data: &[u8]) -> String {
    Sha1::digest(data)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn auth_header(auth: &AuthMethod) -> (String, String) {
    match auth {
        AuthMethod::Basic { username, password } => {
            let credentials =
                base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
            ("Authorization".to_string(), format!("Basic {credentials}"))
        }
        AuthMethod::Token(token) => (HEADER_API_KEY.to_string(), token.clone()),
    }
}
