//! The `ApplicationStore` trait.
//!
//! Implemented by storage backends (e.g. `ctrlaltme-store-sqlite`). The
//! importer and the HTTP layer depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::application::{JobApplication, NewJobApplication};

/// Abstraction over a job-application store backend.
///
/// Every method maps to a single statement against the backing table.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ApplicationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new application. Both timestamps are set to the store's
  /// current time.
  fn create(
    &self,
    input: NewJobApplication,
  ) -> impl Future<Output = Result<JobApplication, Self::Error>> + Send + '_;

  /// Persist a new application with a caller-supplied `created_at`.
  ///
  /// Used by the importer so a dated CSV row keeps its date. `updated_at` is
  /// set to the same instant.
  fn create_with_timestamp(
    &self,
    input: NewJobApplication,
    created_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<JobApplication, Self::Error>> + Send + '_;

  /// Retrieve an application by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<JobApplication>, Self::Error>> + Send + '_;

  /// List every application, ordered by id.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<JobApplication>, Self::Error>> + Send + '_;

  /// Replace all mutable fields of `id` and refresh `updated_at`.
  ///
  /// Existence is not checked first: if no row has this id the call is a
  /// successful no-op and returns `None`.
  fn update(
    &self,
    id: i64,
    input: NewJobApplication,
  ) -> impl Future<Output = Result<Option<JobApplication>, Self::Error>> + Send + '_;

  /// Delete an application. Deleting a missing id is not an error.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
