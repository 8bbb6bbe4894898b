//! Task polling.
//!
//! `GET /v1/validate/{task_id}` is queried at a fixed interval until the
//! task reports `DONE` or `ERROR`, the server answers 404, or the attempt
//! budget runs out. No backoff, no jitter; the server knows nothing about
//! the budget.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

use super::transport::Transport;
use super::ValidationClient;
use crate::error::ClientResult;
use crate::models::TaskStatus;

/// Wait between two status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Attempt budget of the full client.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Attempt budget of the minimal client.
pub const MINIMAL_MAX_ATTEMPTS: u32 = 5;

/// Polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollOptions {
    /// Same interval, five attempts.
    pub fn minimal() -> Self {
        Self {
            max_attempts: MINIMAL_MAX_ATTEMPTS,
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Suspends the poll loop between attempts.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Real timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How a poll loop ended.
///
/// `NotFound` and `TimedOut` are ordinary results, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Task reached `DONE` or `ERROR`; the full status body.
    Finished(Value),
    /// Server answered 404 for the task id.
    NotFound,
    /// Attempt budget exhausted before a terminal status.
    TimedOut { task_id: String },
}

impl PollOutcome {
    /// True for `NotFound` and `TimedOut`.
    pub fn is_error(&self) -> bool {
        !matches!(self, PollOutcome::Finished(_))
    }

    /// JSON form printed to the user:
    /// the status body, `{"error": "Task not found"}`, or
    /// `{"error": "Polling timed out", "task_id": ...}`.
    pub fn into_json(self) -> Value {
        match self {
            PollOutcome::Finished(body) => body,
            PollOutcome::NotFound => json!({ "error": "Task not found" }),
            PollOutcome::TimedOut { task_id } => json!({
                "error": "Polling timed out",
                "task_id": task_id,
            }),
        }
    }
}

impl<T: Transport, D: Delay> ValidationClient<T, D> {
    /// Poll a task until it finishes, disappears, or the budget runs out.
    ///
    /// Non-JSON status bodies and transport failures abort with an error.
    pub async fn poll_task(
        &self,
        task_id: &str,
        options: &PollOptions,
    ) -> ClientResult<PollOutcome> {
        let url = self.endpoints.task_status(task_id);

        for attempt in 1..=options.max_attempts {
            let response = self.transport.get(&url).await?;
            tracing::info!(
                attempt,
                status_code = response.status,
                "[poll {}] status code: {}",
                attempt,
                response.status
            );

            if response.status == 404 {
                tracing::warn!(task_id, "Task not found");
                return Ok(PollOutcome::NotFound);
            }

            let body = response.json()?;
            let status = TaskStatus::from_body(&body);
            tracing::info!(
                task_id,
                "Task status: {}",
                status.as_ref().map(TaskStatus::as_str).unwrap_or("<missing>")
            );

            if status.as_ref().is_some_and(TaskStatus::is_terminal) {
                return Ok(PollOutcome::Finished(body));
            }

            if attempt < options.max_attempts {
                self.delay.wait(options.interval).await;
            }
        }

        tracing::warn!(task_id, attempts = options.max_attempts, "Polling timed out");
        Ok(PollOutcome::TimedOut {
            task_id: task_id.to_string(),
        })
    }
}
