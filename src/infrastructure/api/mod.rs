//! HTTP client for the Naira server's REST API

use async_trait::async_trait;
use reqwest::{header, redirect, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::errors::ApiError;
use crate::domain::entities::{AuthStatus, StudySession, Task, TaskStatus};
use crate::domain::traits::StudyApi;

/// `{"tasks": [...]}`
#[derive(Deserialize, Debug)]
struct TaskList {
    tasks: Vec<Task>,
}

/// `{"study_sessions": [...]}`
#[derive(Deserialize, Debug)]
struct SessionList {
    study_sessions: Vec<StudySession>,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: TaskStatus,
}

#[derive(Serialize)]
struct NewSession<'a> {
    subject: &'a str,
}

/// reqwest-backed implementation of [`StudyApi`]
pub struct HttpStudyApi {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl HttpStudyApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration, token: Option<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        // The server answers a signed-out API call with a redirect to its login page
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| ApiError::Connect {
                url: base_url.clone(),
                detail: e.to_string(),
            })?;
        Ok(Self {
            base_url,
            client,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::Connect {
                url: url.to_string(),
                detail: e.to_string(),
            })?;

        if response.status().is_redirection() {
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            tracing::debug!(url, location, "request redirected; treating as signed out");
        }
        check_status(response.status(), url)?;
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T, ApiError> {
        let response = self.send(request, url).await?;
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            url: url.to_string(),
            detail: e.to_string(),
        })
    }
}

fn check_status(status: StatusCode, url: &str) -> Result<(), ApiError> {
    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || status.is_redirection()
    {
        return Err(ApiError::Unauthorized(url.to_string()));
    }
    if !status.is_success() {
        return Err(ApiError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl StudyApi for HttpStudyApi {
    async fn check_auth(&self) -> Result<AuthStatus, ApiError> {
        let url = self.url("/auth/check");
        self.send_json(self.client.get(&url), &url).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.url("/api/tasks");
        let list: TaskList = self.send_json(self.client.get(&url), &url).await?;
        Ok(list.tasks)
    }

    async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<Task, ApiError> {
        let url = self.url(&format!("/api/tasks/{}", task_id));
        tracing::debug!(task_id, status = status.as_str(), "updating task status");
        let request = self.client.put(&url).json(&StatusUpdate { status });
        self.send_json(request, &url).await
    }

    async fn delete_task(&self, task_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/tasks/{}", task_id));
        self.send(self.client.delete(&url), &url).await?;
        Ok(())
    }

    async fn list_study_sessions(&self) -> Result<Vec<StudySession>, ApiError> {
        let url = self.url("/api/study-sessions");
        let list: SessionList = self.send_json(self.client.get(&url), &url).await?;
        Ok(list.study_sessions)
    }

    async fn start_study_session(&self, subject: &str) -> Result<StudySession, ApiError> {
        let url = self.url("/api/study-sessions");
        let request = self.client.post(&url).json(&NewSession { subject });
        self.send_json(request, &url).await
    }

    async fn end_study_session(&self, session_id: i64) -> Result<StudySession, ApiError> {
        let url = self.url(&format!("/api/study-sessions/{}/end", session_id));
        self.send_json(self.client.post(&url), &url).await
    }
}
