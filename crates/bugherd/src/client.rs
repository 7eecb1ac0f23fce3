//! HTTP client for the BugHerd REST API.
//!
//! Every request is a `GET` carrying HTTP Basic auth with the API key as user
//! name and `x` as password. Status codes are mapped to [`Error`] variants in
//! this order: 429, 401, 404, then any other non-2xx.

use crate::config::Config;
use crate::domain::{
    Comment, CommentsResponse, Project, ProjectResponse, ProjectsResponse, Task, TaskFilter,
    TaskResponse, TasksResponse,
};
use crate::error::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Password half of the Basic auth pair. BugHerd ignores it.
const BASIC_AUTH_PASSWORD: &str = "x";

const USER_AGENT: &str = concat!("bugherd-mcp/", env!("CARGO_PKG_VERSION"));

/// Client for the BugHerd API.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct BugherdClient {
    http: reqwest::Client,
    config: Config,
}

impl BugherdClient {
    /// Create a client from the given configuration.
    ///
    /// No network traffic happens here and the API key is not read yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// List all projects visible to the API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing, the request fails, or the API
    /// responds with a non-success status.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let resp: ProjectsResponse = self.get("/projects.json", &[]).await?;
        Ok(resp.projects)
    }

    /// Get a single project.
    ///
    /// # Errors
    ///
    /// See [`BugherdClient::list_projects`]; a missing project is [`Error::NotFound`].
    pub async fn get_project(&self, project_id: u64) -> Result<Project> {
        let resp: ProjectResponse = self
            .get(&format!("/projects/{project_id}.json"), &[])
            .await?;
        Ok(resp.project)
    }

    /// List tasks in a project. Unset filter fields are omitted from the query.
    ///
    /// # Errors
    ///
    /// See [`BugherdClient::list_projects`].
    pub async fn list_tasks(&self, project_id: u64, filter: &TaskFilter) -> Result<TasksResponse> {
        self.get(
            &format!("/projects/{project_id}/tasks.json"),
            &filter.query_pairs(),
        )
        .await
    }

    /// Get a single task.
    ///
    /// # Errors
    ///
    /// See [`BugherdClient::list_projects`].
    pub async fn get_task(&self, project_id: u64, task_id: u64) -> Result<Task> {
        let resp: TaskResponse = self
            .get(&format!("/projects/{project_id}/tasks/{task_id}.json"), &[])
            .await?;
        Ok(resp.task)
    }

    /// List comments on a task.
    ///
    /// # Errors
    ///
    /// See [`BugherdClient::list_projects`].
    pub async fn list_comments(&self, project_id: u64, task_id: u64) -> Result<Vec<Comment>> {
        let resp: CommentsResponse = self
            .get(
                &format!("/projects/{project_id}/tasks/{task_id}/comments.json"),
                &[],
            )
            .await?;
        Ok(resp.comments)
    }

    /// Check that the API is reachable with the current key.
    ///
    /// Any failure, including a missing key, is logged and reported as `false`.
    pub async fn test_connection(&self) -> bool {
        match self.list_projects().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "BugHerd connectivity check failed");
                false
            }
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        // Resolved per call so a missing key fails before any network traffic.
        let api_key = self.config.api_key.resolve()?;
        let retry = self.config.retry;

        let mut attempt = 0;
        loop {
            match self.get_once(&api_key, path, query).await {
                Err(Error::RateLimited) if attempt < retry.max_retries => {
                    let delay = retry.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        path,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Rate limited by BugHerd, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        api_key: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{path}", self.config.base_url);
        debug!(path, ?query, "BugHerd request");

        let mut request = self
            .http
            .get(&url)
            .header(AUTHORIZATION, basic_auth_header(api_key))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if let Some(err) = status_error(status, path, &body) {
            warn!(path, status = status.as_u16(), error = %err, "BugHerd request failed");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|source| Error::Decode {
            path: path.to_string(),
            source,
        })
    }
}

/// `Authorization` header value for the given API key.
#[must_use]
pub fn basic_auth_header(api_key: &str) -> String {
    let credentials = STANDARD.encode(format!("{api_key}:{BASIC_AUTH_PASSWORD}"));
    format!("Basic {credentials}")
}

/// Map a response status to an error, or `None` on success.
fn status_error(status: StatusCode, path: &str, body: &str) -> Option<Error> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        Some(Error::RateLimited)
    } else if status == StatusCode::UNAUTHORIZED {
        Some(Error::Unauthorized)
    } else if status == StatusCode::NOT_FOUND {
        Some(Error::NotFound {
            path: path.to_string(),
        })
    } else if !status.is_success() {
        Some(Error::Api {
            status: status.as_u16(),
            body: body.to_string(),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_basic_auth_header() {
        // base64("secret:x")
        assert_eq!(basic_auth_header("secret"), "Basic c2VjcmV0Ong=");
    }

    #[rstest]
    #[case::ok(200)]
    #[case::created(201)]
    #[case::no_content(204)]
    fn test_success_statuses(#[case] code: u16) {
        let status = StatusCode::from_u16(code).unwrap();
        assert!(status_error(status, "/projects.json", "").is_none());
    }

    #[rstest]
    #[case::empty_body("")]
    #[case::json_body(r#"{"error":"Unauthorized"}"#)]
    #[case::text_body("slow down")]
    fn test_rate_limit_ignores_body(#[case] body: &str) {
        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "/projects.json", body).unwrap();
        assert!(matches!(err, Error::RateLimited));
    }

    #[test]
    fn test_unauthorized() {
        let err = status_error(StatusCode::UNAUTHORIZED, "/projects.json", "nope").unwrap();
        assert!(matches!(err, Error::Unauthorized));
    }

    #[test]
    fn test_not_found_includes_path() {
        let err = status_error(StatusCode::NOT_FOUND, "/projects/5.json", "").unwrap();
        assert!(err.to_string().contains("/projects/5.json"));
    }

    #[rstest]
    #[case::bad_request(400)]
    #[case::forbidden(403)]
    #[case::server_error(500)]
    #[case::bad_gateway(502)]
    fn test_other_statuses_are_api_errors(#[case] code: u16) {
        let status = StatusCode::from_u16(code).unwrap();
        match status_error(status, "/projects.json", "details") {
            Some(Error::Api { status, body }) => {
                assert_eq!(status, code);
                assert_eq!(body, "details");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
