//! Task API access.
//!
//! [`TaskApi`] is the seam between the view model and the remote service.
//! [`HttpTaskApi`] talks to the real server over HTTP; tests substitute
//! in-memory implementations.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{CompletionEntry, FeedEntry, NewTask, Task, TaskId};

/// Operations offered by the remote task service.
pub trait TaskApi: Send + Sync {
    /// `GET /tasks/`
    fn list_tasks(&self) -> impl Future<Output = ApiResult<Vec<Task>>> + Send;

    /// `GET /tasks/{id}`
    fn get_task(&self, id: TaskId) -> impl Future<Output = ApiResult<Task>> + Send;

    /// `POST /tasks/`
    fn create_task(&self, task: &NewTask) -> impl Future<Output = ApiResult<Task>> + Send;

    /// `PUT /tasks/{id}` with `{"completed": bool}`; returns the server's copy.
    fn set_completed(
        &self,
        id: TaskId,
        completed: bool,
    ) -> impl Future<Output = ApiResult<Task>> + Send;

    /// `GET /tasks/{id}/history`
    fn task_history(
        &self,
        id: TaskId,
    ) -> impl Future<Output = ApiResult<Vec<CompletionEntry>>> + Send;

    /// `GET /tasks/history`
    fn completion_feed(&self) -> impl Future<Output = ApiResult<Vec<FeedEntry>>> + Send;
}

#[derive(Serialize)]
struct CompletionUpdate {
    completed: bool,
}

/// HTTP implementation of [`TaskApi`].
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    /// Build a client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Client` if the underlying HTTP client cannot be
    /// constructed (for example, no TLS backend is available).
    pub fn new(config: &Config) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL all paths are joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send a request and decode its JSON body.
    ///
    /// `task` names the task a 404 refers to, for single-task endpoints.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &'static str,
        url: String,
        task: Option<TaskId>,
    ) -> ApiResult<T> {
        debug!(method, %url, "sending request");
        let response = request.send().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        debug!(method, %url, status = status.as_u16(), "received response");
        if !status.is_success() {
            warn!(method, %url, status = status.as_u16(), "request rejected");
            return Err(match (status, task) {
                (StatusCode::NOT_FOUND, Some(id)) => ApiError::NotFound { task_id: id.get() },
                _ => ApiError::Status {
                    url,
                    status: status.as_u16(),
                },
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }
}

impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        let url = self.url("tasks/");
        self.fetch(self.client.get(&url), "GET", url, None).await
    }

    async fn get_task(&self, id: TaskId) -> ApiResult<Task> {
        let url = self.url(&format!("tasks/{}", id));
        self.fetch(self.client.get(&url), "GET", url, Some(id)).await
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<Task> {
        task.validate()?;
        let url = self.url("tasks/");
        self.fetch(self.client.post(&url).json(task), "POST", url, None)
            .await
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> ApiResult<Task> {
        let url = self.url(&format!("tasks/{}", id));
        let request = self.client.put(&url).json(&CompletionUpdate { completed });
        self.fetch(request, "PUT", url, Some(id)).await
    }

    async fn task_history(&self, id: TaskId) -> ApiResult<Vec<CompletionEntry>> {
        let url = self.url(&format!("tasks/{}/history", id));
        self.fetch(self.client.get(&url), "GET", url, Some(id)).await
    }

    async fn completion_feed(&self) -> ApiResult<Vec<FeedEntry>> {
        let url = self.url("tasks/history");
        self.fetch(self.client.get(&url), "GET", url, None).await
    }
}

static_assertions::assert_impl_all!(HttpTaskApi: Send, Sync);
