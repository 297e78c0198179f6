//! Client configuration.

use std::env;

use crate::error::ConfigError;

pub const ENV_URL: &str = "ARTIFACTORY_URL";
pub const ENV_USERNAME: &str = "ARTIFACTORY_USERNAME";
pub const ENV_PASSWORD: &str = "ARTIFACTORY_PASSWORD";
pub const ENV_TOKEN: &str = "ARTIFACTORY_TOKEN";
pub const ENV_DEBUG: &str = "ARTIFACTORY_DEBUG";

/// How requests authenticate against Artifactory.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// HTTP Basic credentials in the `Authorization` header.
    Basic { username: String, password: String },
    /// API key sent as `X-JFrog-Art-Api`.
    Token(String),
}

// Secrets stay out of debug output.
impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            AuthMethod::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
        }
    }
}

/// Immutable settings for an `ArtifactoryClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth: AuthMethod,
}

impl ClientConfig {
    pub fn basic(base_url: &str, username: &str, password: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            auth: AuthMethod::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
        }
    }

    pub fn token(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            auth: AuthMethod::Token(token.to_string()),
        }
    }

    /// Load configuration from `ARTIFACTORY_*` environment variables.
    ///
    /// `ARTIFACTORY_URL` is required. A non-empty `ARTIFACTORY_TOKEN` selects
    /// token auth; otherwise `ARTIFACTORY_USERNAME` and `ARTIFACTORY_PASSWORD`
    /// must both be set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = non_empty_var(ENV_URL).ok_or(ConfigError::MissingVar(ENV_URL))?;

        if let Some(token) = non_empty_var(ENV_TOKEN) {
            return Ok(Self {
                base_url,
                auth: AuthMethod::Token(token),
            });
        }

        let username = non_empty_var(ENV_USERNAME).ok_or(ConfigError::MissingVar(ENV_USERNAME))?;
        let password = non_empty_var(ENV_PASSWORD).ok_or(ConfigError::MissingVar(ENV_PASSWORD))?;
        Ok(Self {
            base_url,
            auth: AuthMethod::Basic { username, password },
        })
    }
}

/// True when `ARTIFACTORY_DEBUG` is set to any non-empty value.
pub fn debug_from_env() -> bool {
    non_empty_var(ENV_DEBUG).is_some()
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
