//! Minimal blocking client for the Artifactory REST API.
//!
//! # Overview
//! `ArtifactoryClient` exposes four verbs (`get`, `post`, `put`, `delete`)
//! that all share one request routine: join the path onto the base URL,
//! encode query options, attach the checksum, static and auth headers, send
//! the request over the owned `Transport`, and classify the response.
//!
//! # Design
//! - Options are an immutable `RequestOptions` value; the content type is an
//!   explicit field rather than a reserved map entry.
//! - Authentication is a closed `AuthMethod` enum: basic credentials or an
//!   API token.
//! - Debug logging is an injected `RequestLogger`, so the request path never
//!   reads the environment.
//! - Failed responses still hand back their raw body through
//!   `ClientError::body`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod options;
pub mod transport;
pub mod types;

pub use client::{parse_response, ArtifactoryClient};
pub use config::{AuthMethod, ClientConfig};
pub use error::{ClientError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use logging::{RequestLogger, TracingLogger};
pub use options::RequestOptions;
pub use transport::{Transport, UreqTransport};
pub use types::{ErrorEntry, ErrorPayload};
