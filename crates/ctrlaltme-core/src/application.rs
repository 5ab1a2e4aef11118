//! The job-application record and its status enumeration.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where an application currently stands. Unknown input normalises to
/// [`Status::Applied`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  #[default]
  Applied,
  Interview,
  Offer,
  Rejected,
}

impl Status {
  pub const ALL: [Status; 4] =
    [Self::Applied, Self::Interview, Self::Offer, Self::Rejected];

  /// The value stored in the `status` column and sent over the wire.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Applied => "applied",
      Self::Interview => "interview",
      Self::Offer => "offer",
      Self::Rejected => "rejected",
    }
  }

  /// Parse after trimming and lower-casing. Returns `None` for anything
  /// outside the four known values.
  pub fn parse(raw: &str) -> Option<Self> {
    let needle = raw.trim().to_lowercase();
    Self::ALL.into_iter().find(|s| s.as_str() == needle)
  }

  /// Like [`Status::parse`] but falls back to the default. The flag is `true`
  /// when a fallback happened.
  pub fn parse_or_default(raw: &str) -> (Self, bool) {
    match Self::parse(raw) {
      Some(status) => (status, false),
      None => (Self::default(), true),
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Status {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s).ok_or_else(|| Error::UnknownStatus(s.to_owned()))
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// The mutable content of an application. Input to create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJobApplication {
  pub company:  String,
  pub position: String,
  pub link:     String,
  pub status:   Status,
  pub notes:    String,
}

/// A persisted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
  /// Store-assigned; never changes.
  pub id:         i64,
  pub company:    String,
  pub position:   String,
  pub link:       String,
  pub status:     Status,
  pub notes:      String,
  /// Set once on insert.
  pub created_at: DateTime<Utc>,
  /// Refreshed by every update; never earlier than `created_at`.
  pub updated_at: DateTime<Utc>,
}

impl JobApplication {
  /// Assemble a record from its parts.
  pub fn from_new(
    id: i64,
    input: NewJobApplication,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      company: input.company,
      position: input.position,
      link: input.link,
      status: input.status,
      notes: input.notes,
      created_at,
      updated_at,
    }
  }

  /// The mutable fields, detached from identity and timestamps.
  pub fn content(&self) -> NewJobApplication {
    NewJobApplication {
      company:  self.company.clone(),
      position: self.position.clone(),
      link:     self.link.clone(),
      status:   self.status,
      notes:    self.notes.clone(),
    }
  }
}
