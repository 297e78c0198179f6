//! Error types for the Artifactory client.
//!
//! # Design
//! Status errors keep the raw response body so callers can inspect the
//! payload even on failure. `Api` is used when the body is Artifactory's
//! `{"errors": [...]}` shape; every other non-2xx response lands in
//! `UnexpectedStatus`. URL and transport failures happen before any response
//! exists, so they carry no body.

use thiserror::Error;

/// Errors returned by `ArtifactoryClient` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL joined with the request path is not a valid URL.
    #[error("invalid request URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The request never produced a complete response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-2xx status with an Artifactory error list. `message` is the
    /// newline-joined list of server messages.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        body: Vec<u8>,
    },

    /// Non-2xx status whose body is not an Artifactory error list.
    #[error("Non-2xx code returned: {status}. Message follows:\n{}", String::from_utf8_lossy(.body))]
    UnexpectedStatus {
        status: u16,
        body: Vec<u8>,
        /// Why the body did not parse as an error list.
        parse_error: String,
    },
}

impl ClientError {
    /// Raw response body. Empty for URL and transport errors.
    pub fn body(&self) -> &[u8] {
        match self {
            ClientError::Api { body, .. } | ClientError::UnexpectedStatus { body, .. } => body,
            ClientError::UrlParse(_) | ClientError::Transport(_) => &[],
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            ClientError::UrlParse(_) | ClientError::Transport(_) => None,
        }
    }
}

/// Failure inside a `Transport`: DNS, connect, TLS, timeout or body read.
#[derive(Debug, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        Self::with_source(err.to_string(), err)
    }
}

/// Errors loading a `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
}
