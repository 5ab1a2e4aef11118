//! Validation and normalisation of raw textual input.
//!
//! Both the JSON endpoints and the CSV importer funnel through [`normalize`].
//! Bad status and date values degrade to defaults with a [`Warning`]; only a
//! missing company or position rejects the input outright.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  application::{NewJobApplication, Status},
  clock::Clock,
};

/// Format accepted for the import `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Input ───────────────────────────────────────────────────────────────────

/// Unvalidated field values. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawApplication {
  pub company:  Option<String>,
  pub position: Option<String>,
  pub link:     Option<String>,
  pub status:   Option<String>,
  pub notes:    Option<String>,
  /// Only populated on the import path.
  pub date:     Option<String>,
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Why an input could not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
  #[error("missing required field: {0}")]
  MissingRequiredField(&'static str),
}

impl Rejection {
  /// Stable machine-readable reason.
  pub fn code(&self) -> &'static str {
    match self {
      Self::MissingRequiredField(_) => "missing_required_field",
    }
  }
}

/// A value that was replaced by a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
  UnknownStatus(String),
  UnparseableDate(String),
}

impl std::fmt::Display for Warning {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::UnknownStatus(s) => {
        write!(f, "unknown status {s:?}, using {}", Status::default())
      }
      Self::UnparseableDate(d) => {
        write!(f, "unparseable date {d:?}, using current time")
      }
    }
  }
}

/// An accepted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
  pub application: NewJobApplication,
  /// Midnight UTC of the supplied date, or the clock reading.
  pub created_at:  DateTime<Utc>,
  pub warnings:    Vec<Warning>,
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Validate `raw` and coerce it into a [`NewJobApplication`].
pub fn normalize(
  raw: &RawApplication,
  clock: &dyn Clock,
) -> Result<Normalized, Rejection> {
  let company = required(raw.company.as_deref(), "company")?;
  let position = required(raw.position.as_deref(), "position")?;

  let mut warnings = Vec::new();

  let status = match non_blank(raw.status.as_deref()) {
    None => Status::default(),
    Some(s) => {
      let (status, fell_back) = Status::parse_or_default(s);
      if fell_back {
        warnings.push(Warning::UnknownStatus(s.to_owned()));
      }
      status
    }
  };

  let created_at = match non_blank(raw.date.as_deref()) {
    None => clock.now(),
    Some(d) => parse_date(d).unwrap_or_else(|| {
      warnings.push(Warning::UnparseableDate(d.to_owned()));
      clock.now()
    }),
  };

  Ok(Normalized {
    application: NewJobApplication {
      company,
      position,
      link: raw.link.clone().unwrap_or_default(),
      status,
      notes: raw.notes.clone().unwrap_or_default(),
    },
    created_at,
    warnings,
  })
}

/// Parse a `YYYY-MM-DD` calendar date as midnight UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
  NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
    .ok()
    .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|s| !s.is_empty())
}

fn required(
  value: Option<&str>,
  field: &'static str,
) -> Result<String, Rejection> {
  non_blank(value)
    .map(str::to_owned)
    .ok_or(Rejection::MissingRequiredField(field))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::clock::FixedClock;

  fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap())
  }

  fn raw(company: &str, position: &str) -> RawApplication {
    RawApplication {
      company: Some(company.into()),
      position: Some(position.into()),
      ..Default::default()
    }
  }

  #[test]
  fn minimal_input_gets_defaults() {
    let n = normalize(&raw("Acme", "Engineer"), &clock()).unwrap();
    assert_eq!(n.application.company, "Acme");
    assert_eq!(n.application.position, "Engineer");
    assert_eq!(n.application.link, "");
    assert_eq!(n.application.notes, "");
    assert_eq!(n.application.status, Status::Applied);
    assert_eq!(n.created_at, clock().0);
    assert!(n.warnings.is_empty());
  }

  #[test]
  fn missing_company_is_rejected() {
    let mut input = raw("", "Engineer");
    let err = normalize(&input, &clock()).unwrap_err();
    assert_eq!(err, Rejection::MissingRequiredField("company"));
    assert_eq!(err.code(), "missing_required_field");

    input.company = None;
    assert!(normalize(&input, &clock()).is_err());
  }

  #[test]
  fn blank_position_is_rejected() {
    let err = normalize(&raw("Acme", "   "), &clock()).unwrap_err();
    assert_eq!(err, Rejection::MissingRequiredField("position"));
  }

  #[test]
  fn company_and_position_are_trimmed() {
    let n = normalize(&raw("  Acme ", "\tEngineer"), &clock()).unwrap();
    assert_eq!(n.application.company, "Acme");
    assert_eq!(n.application.position, "Engineer");
  }

  #[test]
  fn status_is_trimmed_and_lowercased() {
    let mut input = raw("Acme", "Engineer");
    input.status = Some(" Interview ".into());
    let n = normalize(&input, &clock()).unwrap();
    assert_eq!(n.application.status, Status::Interview);
    assert!(n.warnings.is_empty());
  }

  #[test]
  fn unknown_status_falls_back_with_warning() {
    let mut input = raw("Acme", "Engineer");
    input.status = Some("banana".into());
    let n = normalize(&input, &clock()).unwrap();
    assert_eq!(n.application.status, Status::Applied);
    assert_eq!(n.warnings, vec![Warning::UnknownStatus("banana".into())]);
  }

  #[test]
  fn valid_date_becomes_midnight_utc() {
    let mut input = raw("Acme", "Engineer");
    input.date = Some("2024-01-15".into());
    let n = normalize(&input, &clock()).unwrap();
    assert_eq!(n.created_at, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    assert!(n.warnings.is_empty());
  }

  #[test]
  fn bad_date_falls_back_to_now_with_warning() {
    let mut input = raw("Acme", "Engineer");
    input.date = Some("not-a-date".into());
    let n = normalize(&input, &clock()).unwrap();
    assert_eq!(n.created_at, clock().0);
    assert_eq!(n.warnings, vec![Warning::UnparseableDate("not-a-date".into())]);
  }

  #[test]
  fn link_and_notes_pass_through_verbatim() {
    let mut input = raw("Acme", "Engineer");
    input.link = Some(" http://x ".into());
    input.notes = Some("great team\nsecond line".into());
    let n = normalize(&input, &clock()).unwrap();
    assert_eq!(n.application.link, " http://x ");
    assert_eq!(n.application.notes, "great team\nsecond line");
  }

  #[test]
  fn both_warnings_are_collected() {
    let mut input = raw("Acme", "Engineer");
    input.status = Some("ghosted".into());
    input.date = Some("15/01/2024".into());
    let n = normalize(&input, &clock()).unwrap();
    assert_eq!(n.warnings.len(), 2);
  }
}
