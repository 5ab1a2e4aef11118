//! [`SqliteStore`], the SQLite implementation of [`ApplicationStore`].

use std::{fmt, path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use ctrlaltme_core::{
  application::{JobApplication, NewJobApplication},
  clock::{Clock, SystemClock},
  store::ApplicationStore,
};

use crate::{
  Result,
  encode::{RawApplication, encode_dt, encode_status},
  schema::{COLUMNS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A job-application store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  clock: Arc<dyn Clock>,
}

impl fmt::Debug for SqliteStore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SqliteStore").finish_non_exhaustive()
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Missing parent directories are created.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }

    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self::from_connection(conn);
    store.init_schema().await?;
    tracing::info!(database = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self::from_connection(conn);
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the time source used to stamp `created_at` / `updated_at`.
  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  /// Close the underlying connection, waiting for queued calls to finish.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  fn from_connection(conn: tokio_rusqlite::Connection) -> Self {
    Self { conn, clock: Arc::new(SystemClock) }
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a row with both timestamps set to `created_at`.
  async fn insert(
    &self,
    input: NewJobApplication,
    created_at: DateTime<Utc>,
  ) -> Result<JobApplication> {
    let company  = input.company.clone();
    let position = input.position.clone();
    let link     = input.link.clone();
    let status   = encode_status(input.status);
    let notes    = input.notes.clone();
    let at_str   = encode_dt(created_at);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO job_applications
             (company, position, link, status, notes, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          rusqlite::params![company, position, link, status, notes, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(JobApplication::from_new(id, input, created_at, created_at))
  }
}

// ─── ApplicationStore impl ───────────────────────────────────────────────────

impl ApplicationStore for SqliteStore {
  type Error = crate::Error;

  async fn create(&self, input: NewJobApplication) -> Result<JobApplication> {
    let now = self.clock.now();
    self.insert(input, now).await
  }

  async fn create_with_timestamp(
    &self,
    input:      NewJobApplication,
    created_at: DateTime<Utc>,
  ) -> Result<JobApplication> {
    self.insert(input, created_at).await
  }

  async fn get(&self, id: i64) -> Result<Option<JobApplication>> {
    let raw: Option<RawApplication> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COLUMNS} FROM job_applications WHERE id = ?1"),
            rusqlite::params![id],
            RawApplication::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawApplication::into_application).transpose()
  }

  async fn list(&self) -> Result<Vec<JobApplication>> {
    let raws: Vec<RawApplication> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {COLUMNS} FROM job_applications ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawApplication::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawApplication::into_application).collect()
  }

  async fn update(
    &self,
    id:    i64,
    input: NewJobApplication,
  ) -> Result<Option<JobApplication>> {
    let status = encode_status(input.status);
    let now    = encode_dt(self.clock.now());

    // Timestamps are fixed-width, so `max` on the text keeps
    // `updated_at >= created_at`.
    let raw: Option<RawApplication> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE job_applications
               SET company = ?1, position = ?2, link = ?3, status = ?4,
                   notes = ?5, updated_at = max(created_at, ?6)
               WHERE id = ?7
               RETURNING {COLUMNS}"
            ),
            rusqlite::params![
              input.company,
              input.position,
              input.link,
              status,
              input.notes,
              now,
              id,
            ],
            RawApplication::from_row,
          )
          .optional()?)
      })
      .await?;

    if raw.is_none() {
      tracing::debug!(id, "update matched no job application");
    }

    raw.map(RawApplication::into_application).transpose()
  }

  async fn delete(&self, id: i64) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM job_applications WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    tracing::debug!(id, removed, "deleted job application");
    Ok(())
  }
}
