//! In-memory fake of the Artifactory REST endpoints the client talks to.
//!
//! Everything is mounted under `/artifactory`. Requests are authenticated
//! with either basic credentials or an `X-JFrog-Art-Api` key, and any
//! `X-Checksum-Sha1` header is verified against the received body. Failures
//! use Artifactory's `{"errors":[{"status":..,"message":..}]}` shape, except
//! `/api/system/error` which answers with a plain-text 500.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha1::{Digest, Sha1};
use tokio::{net::TcpListener, sync::RwLock};

pub const API_KEY_HEADER: &str = "x-jfrog-art-api";
pub const CHECKSUM_HEADER: &str = "x-checksum-sha1";

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub token: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password".to_string(),
            token: "test-api-key".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub key: String,
    pub rclass: String,
    #[serde(rename = "packageType", default = "default_package_type")]
    pub package_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_package_type() -> String {
    "generic".to_string()
}

#[derive(Deserialize)]
pub struct RepositoryUpdate {
    pub description: Option<String>,
    #[serde(rename = "packageType")]
    pub package_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub key: String,
    #[serde(rename = "type")]
    pub repo_type: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeployedArtifact {
    pub repo: String,
    pub path: String,
    pub size: usize,
    pub checksums: Checksums,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checksums {
    pub sha1: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub repo_type: Option<String>,
}

pub struct Store {
    credentials: Credentials,
    repos: RwLock<BTreeMap<String, RepositoryConfig>>,
    artifacts: RwLock<HashMap<(String, String), Vec<u8>>>,
}

pub type Db = Arc<Store>;

/// Error response in Artifactory's error-list shape.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({
            "errors": [{ "status": self.status.as_u16(), "message": self.message }]
        });
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    app_with_credentials(Credentials::default())
}

pub fn app_with_credentials(credentials: Credentials) -> Router {
    let db: Db = Arc::new(Store {
        credentials,
        repos: RwLock::new(BTreeMap::new()),
        artifacts: RwLock::new(HashMap::new()),
    });
    let api = Router::new()
        .route("/api/system/ping", get(ping))
        .route("/api/system/error", get(server_error))
        .route("/api/repositories", get(list_repositories))
        .route(
            "/api/repositories/{key}",
            get(get_repository)
                .put(create_repository)
                .post(update_repository)
                .delete(delete_repository),
        )
        .route("/{repo}/{*path}", get(download_artifact).put(deploy_artifact))
        .with_state(db);
    Router::new().nest("/artifactory", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub fn sha1_hex(data: &[u8]) -> String {
    Sha1::digest(data)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn authorize(db: &Store, headers: &HeaderMap) -> Result<(), ApiFailure> {
    let api_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    let basic = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "));

    let authorized = match (api_key, basic) {
        (Some(_), Some(_)) => {
            return Err(ApiFailure::new(
                StatusCode::BAD_REQUEST,
                "Both basic credentials and an API key were supplied",
            ))
        }
        (Some(key), None) => key == db.credentials.token,
        (None, Some(encoded)) => base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .ok()
            .and_then(|raw| String::from_utf8(raw).ok())
            .is_some_and(|pair| {
                pair == format!("{}:{}", db.credentials.username, db.credentials.password)
            }),
        (None, None) => false,
    };

    if authorized {
        Ok(())
    } else {
        tracing::warn!("rejected unauthenticated request");
        Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "Bad credentials"))
    }
}

fn verify_checksum(headers: &HeaderMap, body: &[u8]) -> Result<(), ApiFailure> {
    let Some(expected) = headers.get(CHECKSUM_HEADER).and_then(|v| v.to_str().ok()) else {
        return Ok(());
    };
    let actual = sha1_hex(body);
    if expected == actual {
        Ok(())
    } else {
        Err(ApiFailure::new(
            StatusCode::CONFLICT,
            format!("Checksum mismatch: header {expected}, computed {actual}"),
        ))
    }
}

fn require_json(headers: &HeaderMap) -> Result<(), ApiFailure> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        Ok(())
    } else {
        Err(ApiFailure::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Content-Type must be application/json",
        ))
    }
}

fn repository_not_found(key: &str) -> ApiFailure {
    ApiFailure::new(StatusCode::NOT_FOUND, format!("Repository {key} not found"))
}

async fn ping() -> &'static str {
    "OK"
}

async fn server_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

async fn list_repositories(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
    body: Bytes,
) -> Result<Json<Vec<RepositorySummary>>, ApiFailure> {
    authorize(&db, &headers)?;
    verify_checksum(&headers, &body)?;
    let repos = db.repos.read().await;
    let summaries = repos
        .values()
        .filter(|r| {
            query
                .repo_type
                .as_deref()
                .map_or(true, |t| r.rclass.eq_ignore_ascii_case(t))
        })
        .map(|r| RepositorySummary {
            key: r.key.clone(),
            repo_type: r.rclass.to_uppercase(),
            url: format!("/artifactory/{}", r.key),
        })
        .collect();
    Ok(Json(summaries))
}

async fn get_repository(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Result<Json<RepositoryConfig>, ApiFailure> {
    authorize(&db, &headers)?;
    let repos = db.repos.read().await;
    repos
        .get(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| repository_not_found(&key))
}

async fn create_repository(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<String, ApiFailure> {
    authorize(&db, &headers)?;
    verify_checksum(&headers, &body)?;
    require_json(&headers)?;
    let mut config: RepositoryConfig = serde_json::from_slice(&body).map_err(|e| {
        ApiFailure::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid repository configuration: {e}"),
        )
    })?;
    config.key = key.clone();

    let mut repos = db.repos.write().await;
    if repos.contains_key(&key) {
        return Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            format!("Repository {key} already exists"),
        ));
    }
    repos.insert(key.clone(), config);
    Ok(format!("Successfully created repository '{key}'"))
}

async fn update_repository(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<String, ApiFailure> {
    authorize(&db, &headers)?;
    verify_checksum(&headers, &body)?;
    let update: RepositoryUpdate = serde_json::from_slice(&body).map_err(|e| {
        ApiFailure::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid repository configuration: {e}"),
        )
    })?;

    let mut repos = db.repos.write().await;
    let repo = repos.get_mut(&key).ok_or_else(|| repository_not_found(&key))?;
    if let Some(description) = update.description {
        repo.description = Some(description);
    }
    if let Some(package_type) = update.package_type {
        repo.package_type = package_type;
    }
    Ok(format!("Repository {key} update successfully."))
}

async fn delete_repository(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<String, ApiFailure> {
    authorize(&db, &headers)?;
    verify_checksum(&headers, &body)?;
    db.repos
        .write()
        .await
        .remove(&key)
        .ok_or_else(|| repository_not_found(&key))?;
    db.artifacts.write().await.retain(|(repo, _), _| repo != &key);
    Ok(format!(
        "Repository {key} and all its content have been removed successfully."
    ))
}

async fn deploy_artifact(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((repo, path)): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<DeployedArtifact>), ApiFailure> {
    authorize(&db, &headers)?;
    verify_checksum(&headers, &body)?;
    if !db.repos.read().await.contains_key(&repo) {
        return Err(repository_not_found(&repo));
    }
    let deployed = DeployedArtifact {
        repo: repo.clone(),
        path: path.clone(),
        size: body.len(),
        checksums: Checksums {
            sha1: sha1_hex(&body),
        },
    };
    db.artifacts.write().await.insert((repo, path), body.to_vec());
    Ok((StatusCode::CREATED, Json(deployed)))
}

async fn download_artifact(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((repo, path)): Path<(String, String)>,
) -> Result<Vec<u8>, ApiFailure> {
    authorize(&db, &headers)?;
    let artifacts = db.artifacts.read().await;
    artifacts
        .get(&(repo.clone(), path.clone()))
        .cloned()
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, format!("File not found: {repo}/{path}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_config_defaults_package_type() {
        let config: RepositoryConfig = serde_json::from_str(r#"{"rclass":"local"}"#).unwrap();
        assert_eq!(config.package_type, "generic");
        assert!(config.key.is_empty());
        assert!(config.description.is_none());
    }

    #[test]
    fn repository_config_rejects_missing_rclass() {
        let result: Result<RepositoryConfig, _> = serde_json::from_str(r#"{"key":"libs"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn summary_serializes_type_field() {
        let summary = RepositorySummary {
            key: "libs".to_string(),
            repo_type: "LOCAL".to_string(),
            url: "/artifactory/libs".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "LOCAL");
    }

    #[test]
    fn checksum_header_must_match_body() {
        let mut headers = HeaderMap::new();
        headers.insert(CHECKSUM_HEADER, sha1_hex(b"abc").parse().unwrap());
        assert!(verify_checksum(&headers, b"abc").is_ok());
        let err = verify_checksum(&headers, b"abd").unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn missing_checksum_header_is_accepted() {
        assert!(verify_checksum(&HeaderMap::new(), b"anything").is_ok());
    }

    #[test]
    fn failure_renders_error_list() {
        let failure = ApiFailure::new(StatusCode::NOT_FOUND, "Repository libs not found");
        let response = failure.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
