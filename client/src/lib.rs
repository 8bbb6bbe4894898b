//! # checks-client - QC Tool validation API client
//!
//! Sends a dataset and its data dictionary to the QC Tool validation API and
//! collects the result, either in one blocking call or through an async task
//! that is polled until it finishes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ CSV / JSON  │────▶│   Loader    │────▶│  Envelope   │────▶│  API client │
//! │  (2 files)  │     │ (rows, enc) │     │ dataset+dic │     │ (POST, poll)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checks_client::{Mode, PollOptions, ValidationClient};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ValidationClient::from_env();
//!     let dataset = Path::new("dataset.csv");
//!     let datadic = Path::new("datadic.csv");
//!     let result = client
//!         .run(Mode::Async, dataset, datadic, &PollOptions::default())
//!         .await
//!         .unwrap();
//!     println!("{}", result);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Rows, request envelope, task status
//! - [`loader`] - CSV / JSON file to rows
//! - [`request`] - Request envelope builder
//! - [`config`] - Deploy environment and base URL
//! - [`api`] - HTTP client, endpoints, poll loop
//! - [`console`] - CLI output

// Core modules
pub mod error;
pub mod models;

// Input
pub mod loader;
pub mod request;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// CLI output
pub mod console;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ClientError, ClientResult, LoadError, LoadResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Record, RequestEnvelope, RowSet, TaskStatus};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use loader::{
    csv_rows,
    decode_content,
    detect_encoding,
    file_to_rows,
    file_to_rows_with,
    rows_from_json,
    FileFormat,
    LoadOptions,
};

pub use request::{build_request_body, build_request_body_with, build_row_set};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{Config, DeployEnvironment};

// =============================================================================
// Re-exports - API client
// =============================================================================

pub use api::{
    Delay,
    Endpoints,
    HttpResponse,
    HttpTransport,
    Mode,
    PollOptions,
    PollOutcome,
    TokioDelay,
    Transport,
    UnknownMode,
    ValidationClient,
};
