//! Request builder: dataset + data dictionary files to a [`RequestEnvelope`].

use std::path::Path;

use crate::error::LoadResult;
use crate::loader::{file_to_rows_with, LoadOptions};
use crate::models::{RequestEnvelope, RowSet};

/// Load both files with default options and wrap them in an envelope.
pub fn build_request_body(
    dataset_path: impl AsRef<Path>,
    datadic_path: impl AsRef<Path>,
) -> LoadResult<RequestEnvelope> {
    build_request_body_with(dataset_path, datadic_path, &LoadOptions::default())
}

/// Load both files and wrap them in an envelope.
///
/// The dataset is loaded first; the first failure is returned as is.
pub fn build_request_body_with(
    dataset_path: impl AsRef<Path>,
    datadic_path: impl AsRef<Path>,
    options: &LoadOptions,
) -> LoadResult<RequestEnvelope> {
    let dataset = file_to_rows_with(dataset_path, options)?;
    let datadic = file_to_rows_with(datadic_path, options)?;

    tracing::debug!(
        dataset_rows = dataset.len(),
        datadic_rows = datadic.len(),
        "built request envelope"
    );

    Ok(RequestEnvelope::from_rows(dataset, datadic))
}

/// Load a single file as `{ "rows": [...] }`.
pub fn build_row_set(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<RowSet> {
    file_to_rows_with(path, options).map(RowSet::new)
}
