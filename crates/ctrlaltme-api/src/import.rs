//! Handler for `POST /job-applications/import`.
//!
//! Accepts a multipart upload whose `file` field holds a CSV document with
//! columns `date, company, position, link, status, notes` and an optional
//! header row.

use axum::{Json, extract::State};
use ctrlaltme_core::{
  ingest::{import_rows, parse_csv},
  store::ApplicationStore,
};
use serde::Serialize;

use crate::{ApiState, error::ApiError, extract::Upload};

/// Name of the multipart field carrying the CSV document.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ImportResponse {
  pub message:  &'static str,
  pub imported: usize,
  pub skipped:  usize,
}

/// `POST /job-applications/import` (multipart, field `file`)
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Upload(mut multipart): Upload,
) -> Result<Json<ImportResponse>, ApiError>
where
  S: ApplicationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut content = None;
  while let Some(field) = multipart.next_field().await? {
    if field.name() == Some(FILE_FIELD) {
      content = Some(field.bytes().await?);
    }
  }

  let content = content.ok_or_else(|| {
    ApiError::BadRequest(format!("multipart field {FILE_FIELD:?} is missing"))
  })?;

  let rows = parse_csv(&content)
    .map_err(|e| ApiError::BadRequest(format!("failed to read CSV records: {e}")))?;

  let report = import_rows(state.store.as_ref(), state.clock.as_ref(), rows)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(
    imported = report.imported.len(),
    skipped = report.skipped.len(),
    "CSV import finished"
  );

  Ok(Json(ImportResponse {
    message:  "CSV file uploaded successfully",
    imported: report.imported.len(),
    skipped:  report.skipped.len(),
  }))
}
