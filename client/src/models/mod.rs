//! Wire models shared by the loader, the request builder and the client.
//!
//! - [`Record`] - One row of an input file, field name to value
//! - [`RowSet`] - `{ "rows": [...] }` wrapper used by every endpoint
//! - [`RequestEnvelope`] - Dataset plus data dictionary, as posted to the API
//! - [`TaskStatus`] - Status of a server-side validation task
//!
//! Server responses are otherwise kept as raw [`serde_json::Value`]; only the
//! fields the client acts on (`id`, `status`) are inspected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// Rows
// =============================================================================

/// A single row: field name to scalar or text value.
pub type Record = Map<String, Value>;

/// `{ "rows": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    pub rows: Vec<Record>,
}

impl RowSet {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Record>> for RowSet {
    fn from(rows: Vec<Record>) -> Self {
        Self::new(rows)
    }
}

// =============================================================================
// Request Envelope
// =============================================================================

/// Body of `POST /v1/validate` and `POST /v1/validate/core`.
///
/// ```json
/// { "dataset": { "rows": [...] }, "datadic": { "rows": [...] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub dataset: RowSet,
    pub datadic: RowSet,
}

impl RequestEnvelope {
    /// Build an envelope from rows already in memory.
    pub fn from_rows(dataset: Vec<Record>, datadic: Vec<Record>) -> Self {
        Self {
            dataset: RowSet::new(dataset),
            datadic: RowSet::new(datadic),
        }
    }
}

// =============================================================================
// Task Status
// =============================================================================

/// Status reported by `GET /v1/validate/{task_id}`.
///
/// The server owns this enumeration; values the client does not know are kept
/// in [`TaskStatus::Other`] and treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Done,
    Error,
    Other(String),
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PENDING" => TaskStatus::Pending,
            "RUNNING" => TaskStatus::Running,
            "DONE" => TaskStatus::Done,
            "ERROR" => TaskStatus::Error,
            other => TaskStatus::Other(other.to_string()),
        }
    }

    /// Read the `status` field of a status response, if it is a string.
    pub fn from_body(body: &Value) -> Option<Self> {
        body.get("status").and_then(Value::as_str).map(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Done => "DONE",
            TaskStatus::Error => "ERROR",
            TaskStatus::Other(s) => s,
        }
    }

    /// `DONE` and `ERROR` end the poll loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Error)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
