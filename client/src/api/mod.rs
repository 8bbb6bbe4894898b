//! Validation API client.
//!
//! # Async flow
//!
//! ```rust,ignore
//! use checks_client::{Config, PollOptions, ValidationClient};
//!
//! let client = ValidationClient::new(&Config::from_env());
//! let task_id = client.create_task("dataset.csv", "datadic.csv").await?;
//! let outcome = client.poll_task(&task_id, &PollOptions::default()).await?;
//! println!("{}", serde_json::to_string_pretty(&outcome.into_json())?);
//! ```
//!
//! Every call returns the first failure unchanged through `?`; only the
//! binary decides how to report it.

pub mod endpoints;
pub mod poll;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::loader::LoadOptions;
use crate::models::RequestEnvelope;
use crate::request::{build_request_body_with, build_row_set};

pub use endpoints::Endpoints;
pub use poll::{Delay, PollOptions, PollOutcome, TokioDelay};
pub use transport::{HttpResponse, HttpTransport, Transport};

// =============================================================================
// Mode
// =============================================================================

/// What the entry point asks the server to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create a task, then poll it.
    Async,
    /// `POST /v1/validate/core`.
    Sync,
    /// Dataset structure check only.
    Structure,
    /// Data dictionary schema check only.
    Schema,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Async => "async",
            Mode::Sync => "sync",
            Mode::Structure => "structure",
            Mode::Schema => "schema",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode string not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown mode '{0}', use 'async' or 'sync' (or 'structure', 'schema')")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "async" => Ok(Mode::Async),
            "sync" => Ok(Mode::Sync),
            "structure" => Ok(Mode::Structure),
            "schema" => Ok(Mode::Schema),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client for the validation API.
///
/// Generic over the HTTP [`Transport`] and the poll [`Delay`]; the defaults
/// are reqwest and the tokio timer.
pub struct ValidationClient<T = HttpTransport, D = TokioDelay> {
    endpoints: Endpoints,
    transport: T,
    delay: D,
    load_options: LoadOptions,
}

impl ValidationClient {
    /// reqwest client against the configured base URL.
    pub fn new(config: &Config) -> Self {
        Self::with_parts(Endpoints::from_config(config), HttpTransport::new(), TokioDelay)
    }

    /// Configuration from the environment (and `.env`).
    pub fn from_env() -> Self {
        Self::new(&Config::from_env())
    }
}

impl<T: Transport, D: Delay> ValidationClient<T, D> {
    pub fn with_parts(endpoints: Endpoints, transport: T, delay: D) -> Self {
        Self {
            endpoints,
            transport,
            delay,
            load_options: LoadOptions::default(),
        }
    }

    /// CSV options used whenever the client loads input files.
    pub fn with_load_options(mut self, load_options: LoadOptions) -> Self {
        self.load_options = load_options;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Load both files and create an async validation task.
    ///
    /// Returns the task id.
    pub async fn create_task(
        &self,
        dataset_path: impl AsRef<Path>,
        datadic_path: impl AsRef<Path>,
    ) -> ClientResult<String> {
        let envelope = build_request_body_with(dataset_path, datadic_path, &self.load_options)?;
        self.create_task_from_envelope(&envelope).await
    }

    /// `POST /v1/validate` with a prepared envelope.
    pub async fn create_task_from_envelope(
        &self,
        envelope: &RequestEnvelope,
    ) -> ClientResult<String> {
        let response = self.post(&self.endpoints.create_task(), envelope).await?;
        tracing::info!(status_code = response.status, "Create task status: {}", response.status);

        let body = expect_ok(response, "create task")?;
        let task_id =
            task_id_from(&body).ok_or_else(|| ClientError::MissingTaskId(body.to_string()))?;

        tracing::info!(task_id = %task_id, "Created task id: {}", task_id);
        Ok(task_id)
    }

    /// Load both files and validate them in one blocking call.
    pub async fn call_sync_validation(
        &self,
        dataset_path: impl AsRef<Path>,
        datadic_path: impl AsRef<Path>,
    ) -> ClientResult<Value> {
        let envelope = build_request_body_with(dataset_path, datadic_path, &self.load_options)?;
        self.call_sync_validation_with_envelope(&envelope).await
    }

    /// `POST /v1/validate/core` with a prepared envelope.
    pub async fn call_sync_validation_with_envelope(
        &self,
        envelope: &RequestEnvelope,
    ) -> ClientResult<Value> {
        let response = self.post(&self.endpoints.sync_core(), envelope).await?;
        tracing::info!(status_code = response.status, "Sync call status: {}", response.status);

        expect_ok(response, "sync validate/core")
    }

    /// `POST /v1/validate/structure` with the dataset rows.
    pub async fn validate_structure(&self, dataset_path: impl AsRef<Path>) -> ClientResult<Value> {
        let rows = build_row_set(dataset_path, &self.load_options)?;
        let response = self.post(&self.endpoints.structure(), &rows).await?;
        tracing::info!(status_code = response.status, "Structure call status: {}", response.status);

        expect_ok(response, "validate/structure")
    }

    /// `POST /v1/validate/schema` with the data dictionary rows.
    pub async fn validate_schema(&self, datadic_path: impl AsRef<Path>) -> ClientResult<Value> {
        let rows = build_row_set(datadic_path, &self.load_options)?;
        let response = self.post(&self.endpoints.schema(), &rows).await?;
        tracing::info!(status_code = response.status, "Schema call status: {}", response.status);

        expect_ok(response, "validate/schema")
    }

    /// `GET /health`
    pub async fn health(&self) -> ClientResult<Value> {
        let response = self.transport.get(&self.endpoints.health()).await?;
        expect_ok(response, "health")
    }

    /// Run one mode end to end and return the JSON to show the user.
    ///
    /// For [`Mode::Async`] a not-found or timed-out poll is returned as its
    /// `{"error": ...}` object, not as an error.
    pub async fn run(
        &self,
        mode: Mode,
        dataset_path: &Path,
        datadic_path: &Path,
        poll: &PollOptions,
    ) -> ClientResult<Value> {
        match mode {
            Mode::Async => {
                let task_id = self.create_task(dataset_path, datadic_path).await?;
                let outcome = self.poll_task(&task_id, poll).await?;
                Ok(outcome.into_json())
            }
            Mode::Sync => self.call_sync_validation(dataset_path, datadic_path).await,
            Mode::Structure => self.validate_structure(dataset_path).await,
            Mode::Schema => self.validate_schema(datadic_path).await,
        }
    }

    async fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> ClientResult<HttpResponse> {
        let bytes = serde_json::to_vec(body)?;
        self.transport.post_json(url, bytes).await
    }
}

/// 200 with a JSON body, or an error carrying the raw body.
fn expect_ok(response: HttpResponse, operation: &'static str) -> ClientResult<Value> {
    if !response.is_ok() {
        return Err(ClientError::Rejected {
            operation,
            status: response.status,
            body: response.body,
        });
    }
    response.json()
}

/// Non-empty string id; numeric ids are rendered as text.
fn task_id_from(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
