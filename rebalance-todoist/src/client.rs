//! Todoist REST client implementing the scheduler's `TaskService`.

use std::time::Duration;

use rebalance_core::{DayRef, ServiceError, Task, TaskId, TaskService};
use reqwest::{Response, StatusCode};
use tracing::debug;

use crate::retry::{with_retry, RetryConfig};
use crate::wire::{ApiTask, UpdateDue};

pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/rest/v2";

#[derive(Debug, Clone)]
pub struct TodoistConfig {
    pub api_token: String,
    /// Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: String,
    pub retry: RetryConfig,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl TodoistConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryConfig::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Point the client elsewhere (mock servers in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TodoistClient {
    config: TodoistConfig,
    http: reqwest::Client,
}

impl TodoistClient {
    pub fn new(config: TodoistConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Transport(format!("build http client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &TodoistConfig {
        &self.config
    }

    async fn get_tasks(&self, filter: &str) -> Result<Vec<Task>, ServiceError> {
        let resp = self
            .http
            .get(format!("{}/tasks", self.config.base_url))
            .bearer_auth(&self.config.api_token)
            .query(&[("filter", filter)])
            .send()
            .await
            .map_err(transport)?;

        let tasks: Vec<ApiTask> = check(resp)
            .await?
            .json()
            .await
            .map_err(|e| ServiceError::Decode(format!("parse tasks: {e}")))?;

        Ok(tasks.into_iter().map(Task::from).collect())
    }

    async fn update_due(&self, task_id: &TaskId, due_string: &str) -> Result<(), ServiceError> {
        let resp = self
            .http
            .post(format!("{}/tasks/{}", self.config.base_url, task_id))
            .bearer_auth(&self.config.api_token)
            .json(&UpdateDue { due_string })
            .send()
            .await
            .map_err(transport)?;

        check(resp).await?;
        Ok(())
    }
}

impl TaskService for TodoistClient {
    async fn fetch_incomplete_tasks_due(&self, day: &DayRef) -> Result<Vec<Task>, ServiceError> {
        let filter = format!("due: {day}");
        let filter = filter.as_str();
        let tasks =
            with_retry(&self.config.retry, "fetch tasks", move || self.get_tasks(filter)).await?;

        let total = tasks.len();
        let open: Vec<Task> = tasks.into_iter().filter(|t| !t.completed).collect();
        debug!(day = %day, total, open = open.len(), "fetched tasks");
        Ok(open)
    }

    async fn set_task_due(&self, task_id: &TaskId, day: &DayRef) -> Result<(), ServiceError> {
        let due = day.to_string();
        let due = due.as_str();
        with_retry(&self.config.retry, "update task", move || self.update_due(task_id, due)).await?;
        debug!(task = %task_id, due, "updated due date");
        Ok(())
    }
}

fn transport(e: reqwest::Error) -> ServiceError {
    ServiceError::Transport(e.to_string())
}

async fn check(resp: Response) -> Result<Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ServiceError::Auth(format!("{status} {body}")));
    }
    Err(ServiceError::Status {
        status: status.as_u16(),
        body,
    })
}
