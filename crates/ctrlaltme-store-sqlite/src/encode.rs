//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (nanosecond
//! precision, `Z` suffix) so text order matches time order. The status is
//! stored as its lowercase name.

use chrono::{DateTime, SecondsFormat, Utc};
use ctrlaltme_core::application::{JobApplication, Status};

use crate::Result;

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| crate::Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn encode_status(s: Status) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<Status> { Ok(s.parse()?) }

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `job_applications` row.
pub struct RawApplication {
  pub id:         i64,
  pub company:    String,
  pub position:   String,
  pub link:       String,
  pub status:     String,
  pub notes:      String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawApplication {
  /// Read a row selected with [`crate::schema::COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      company:    row.get(1)?,
      position:   row.get(2)?,
      link:       row.get(3)?,
      status:     row.get(4)?,
      notes:      row.get(5)?,
      created_at: row.get(6)?,
      updated_at: row.get(7)?,
    })
  }

  pub fn into_application(self) -> Result<JobApplication> {
    Ok(JobApplication {
      id:         self.id,
      company:    self.company,
      position:   self.position,
      link:       self.link,
      status:     decode_status(&self.status)?,
      notes:      self.notes,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
