//! Error types for the validation client.
//!
//! - [`LoadError`] - Reading dataset / data dictionary files
//! - [`ClientError`] - Talking to the validation API
//!
//! `LoadError` converts into `ClientError` via `From`, so `?` carries a
//! file problem unchanged from the loader up to the entry point.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Row Loading Errors
// =============================================================================

/// Errors while turning an input file into rows.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File extension is neither `.csv` nor `.json`.
    #[error("Unsupported file extension: {0}. Use .csv or .json")]
    UnsupportedExtension(String),

    /// Top-level JSON value is not an array, an object with `rows`, or an object.
    #[error("Unsupported JSON format in {}", path.display())]
    UnsupportedJson { path: PathBuf },

    /// JSON array holding something other than objects.
    #[error("JSON array must contain objects ({}, element {index})", path.display())]
    NonObjectRow { path: PathBuf, index: usize },

    /// `rows` field present but not an array of objects.
    #[error("JSON field 'rows' must be an array of objects in {}", path.display())]
    InvalidRowsField { path: PathBuf },

    /// Failed to read file.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON syntax error.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// CSV syntax error.
    #[error("Invalid CSV in {} (line {line}): {message}", path.display())]
    Csv {
        path: PathBuf,
        line: u64,
        message: String,
    },
}

// =============================================================================
// Client Errors (top-level)
// =============================================================================

/// Errors raised while calling the validation API.
///
/// Soft polling outcomes (task not found, polling timed out) are not errors;
/// see [`crate::api::PollOutcome`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input file could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Request never got a response (connection refused, DNS, ...).
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Server answered with a status other than 200.
    #[error("Error from {operation} (HTTP {status}): {body}")]
    Rejected {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Task creation succeeded but the body carried no usable `id`.
    #[error("No task id returned: {0}")]
    MissingTaskId(String),

    /// Response body was not JSON.
    #[error("Non-JSON response (HTTP {status}): {body}")]
    InvalidJson { status: u16, body: String },

    /// Request envelope could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for row loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for API calls.
pub type ClientResult<T> = Result<T, ClientError>;
