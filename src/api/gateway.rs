use super::error::ApiError;
use crate::domain::{Task, TaskDraft, TaskId};
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Remote task operations. Each call is a single round trip, no retry.
pub trait TaskApi {
    fn list(&self) -> Result<Vec<Task>, ApiError>;
    fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError>;
    fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<Task, ApiError>;
    fn delete(&self, id: TaskId) -> Result<(), ApiError>;
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// HTTP implementation of [`TaskApi`] over the `/api/tasks` endpoints
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/api/tasks/{}", self.base_url, id)
    }

    /// Exchange credentials for a bearer token
    pub fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/auth/login", self.base_url);
        let request = self
            .client
            .post(url)
            .json(&LoginRequest { username, password });
        let response: LoginResponse = self.send(request)?.ok_or_else(empty_body)?;
        Ok(response.token)
    }

    /// Send a request and decode the JSON body.
    ///
    /// `204 No Content` and empty bodies yield `None` without parsing.
    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().map_err(|e| {
            warn!(error = %e, "transport failure");
            ApiError::transport(e)
        })?;

        let status = response.status();
        let body = response.text().map_err(|e| ApiError::RequestFailed {
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            warn!(status = status.as_u16(), "request rejected");
            return Err(ApiError::RequestFailed {
                status: Some(status.as_u16()),
                body,
            });
        }

        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ApiError::RequestFailed {
                status: Some(status.as_u16()),
                body: format!("invalid response body ({e}): {body}"),
            })
    }
}

fn empty_body() -> ApiError {
    ApiError::RequestFailed {
        status: None,
        body: "empty response body".to_string(),
    }
}

impl TaskApi for HttpGateway {
    fn list(&self) -> Result<Vec<Task>, ApiError> {
        debug!(url = %self.tasks_url(), "GET tasks");
        let tasks: Option<Vec<Task>> = self.send(self.client.get(self.tasks_url()))?;
        Ok(tasks.unwrap_or_default())
    }

    fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        debug!(title = %draft.title, "POST task");
        self.send(self.client.post(self.tasks_url()).json(draft))?
            .ok_or_else(empty_body)
    }

    fn update(&self, id: TaskId, draft: &TaskDraft) -> Result<Task, ApiError> {
        debug!(id, completed = draft.completed, "PUT task");
        self.send(self.client.put(self.task_url(id)).json(draft))?
            .ok_or_else(empty_body)
    }

    fn delete(&self, id: TaskId) -> Result<(), ApiError> {
        debug!(id, "DELETE task");
        self.send::<serde_json::Value>(self.client.delete(self.task_url(id)))?;
        Ok(())
    }
}
