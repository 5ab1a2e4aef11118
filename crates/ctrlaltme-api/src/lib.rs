//! JSON REST API for the job tracker.
//!
//! Exposes an axum [`Router`] backed by any
//! [`ctrlaltme_core::store::ApplicationStore`]. CORS, static files and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ctrlaltme_api::api_router(state))
//! ```

pub mod applications;
pub mod error;
pub mod extract;
pub mod import;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use ctrlaltme_core::{clock::Clock, store::ApplicationStore};

pub use error::ApiError;

/// Largest accepted CSV upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared state threaded through all API handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub clock: Arc<dyn Clock>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), clock: self.clock.clone() }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. Unmatched paths get a JSON 404.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ApplicationStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/job-applications",
      get(applications::list::<S>)
        .post(applications::create::<S>)
        .put(applications::update::<S>),
    )
    .route(
      "/job-applications/import",
      post(import::handler::<S>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
    )
    .route(
      "/job-applications/{id}",
      get(applications::get_one::<S>).delete(applications::delete_one::<S>),
    )
    .fallback(not_found)
    .with_state(state)
}

async fn not_found() -> ApiError { ApiError::NotFound("no such endpoint".into()) }
