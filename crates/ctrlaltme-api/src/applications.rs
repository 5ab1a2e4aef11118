//! Handlers for `/job-applications` CRUD endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/job-applications` | All records, ordered by id |
//! | `POST`   | `/job-applications` | Body: [`ApplicationBody`]; returns 201 + stored record |
//! | `PUT`    | `/job-applications` | Body: [`UpdateBody`]; full replacement |
//! | `GET`    | `/job-applications/:id` | 404 if not found |
//! | `DELETE` | `/job-applications/:id` | 204; idempotent |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use ctrlaltme_core::{
  application::JobApplication,
  normalize::{RawApplication, normalize},
  store::ApplicationStore,
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::ApiError,
  extract::{JsonBody, PathParam},
};

// ─── Bodies ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /job-applications`. Missing fields are
/// treated as absent; `company` and `position` are required.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationBody {
  pub company:  Option<String>,
  pub position: Option<String>,
  pub link:     Option<String>,
  pub status:   Option<String>,
  pub notes:    Option<String>,
}

impl From<ApplicationBody> for RawApplication {
  fn from(b: ApplicationBody) -> Self {
    RawApplication {
      company:  b.company,
      position: b.position,
      link:     b.link,
      status:   b.status,
      notes:    b.notes,
      date:     None,
    }
  }
}

/// JSON body accepted by `PUT /job-applications`: the full record.
///
/// `created_at` / `updated_at` may be present (clients echo back what they
/// read) but are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub id:     i64,
  #[serde(flatten)]
  pub fields: ApplicationBody,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /job-applications`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<JobApplication>>, ApiError>
where
  S: ApplicationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let apps = state
    .store
    .list()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(apps))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /job-applications/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  PathParam(id): PathParam<i64>,
) -> Result<Json<JobApplication>, ApiError>
where
  S: ApplicationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let app = state
    .store
    .get(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("job application {id} not found")))?;
  Ok(Json(app))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /job-applications`: returns 201 + the stored [`JobApplication`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  JsonBody(body): JsonBody<ApplicationBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ApplicationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let normalized = normalize(&RawApplication::from(body), state.clock.as_ref())?;
  for warning in &normalized.warnings {
    tracing::warn!("create: {warning}");
  }

  let app = state
    .store
    .create(normalized.application)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(id = app.id, company = %app.company, "created job application");
  Ok((StatusCode::CREATED, Json(app)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /job-applications`: replaces every mutable field of `body.id`.
///
/// An unknown id is not an error: nothing is written and the normalised input
/// is echoed back.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  JsonBody(body): JsonBody<UpdateBody>,
) -> Result<Json<JobApplication>, ApiError>
where
  S: ApplicationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = body.id;
  let normalized = normalize(&RawApplication::from(body.fields), state.clock.as_ref())?;
  for warning in &normalized.warnings {
    tracing::warn!(id, "update: {warning}");
  }

  let echo = normalized.application.clone();
  let app = state
    .store
    .update(id, normalized.application)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .unwrap_or_else(|| {
      let now = state.clock.now();
      JobApplication::from_new(id, echo, now, now)
    });

  Ok(Json(app))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /job-applications/:id`. Responds 204 whether or not the record existed.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  PathParam(id): PathParam<i64>,
) -> Result<StatusCode, ApiError>
where
  S: ApplicationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .delete(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
