//! Bulk ingestion of raw rows (typically a CSV upload).
//!
//! Rows are positional: `date, company, position, link, status, notes`, with
//! the last two optional. A bad row is skipped and logged; only a store
//! failure aborts the batch, and rows persisted before it stay persisted.

use crate::{
  Result,
  application::JobApplication,
  clock::Clock,
  normalize::{RawApplication, Rejection, normalize},
  store::ApplicationStore,
};

/// Rows shorter than this are skipped.
pub const MIN_COLUMNS: usize = 4;

/// First-column values that mark a header row.
const HEADER_MARKERS: [&str; 2] = ["date", "company"];

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  /// The row had this many columns.
  InsufficientColumns(usize),
  Rejected(Rejection),
}

impl SkipReason {
  pub fn code(&self) -> &'static str {
    match self {
      Self::InsufficientColumns(_) => "insufficient_columns",
      Self::Rejected(r) => r.code(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
  /// 1-based position in the batch (after header removal).
  pub row:    usize,
  pub reason: SkipReason,
}

/// Outcome of [`import_rows`].
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
  /// Persisted records, in input order.
  pub imported: Vec<JobApplication>,
  pub skipped:  Vec<SkippedRow>,
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Decode a CSV body into rows. No header handling; rows may differ in
/// length.
pub fn parse_csv(data: &[u8]) -> Result<Vec<Vec<String>>> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(true)
    .from_reader(data);

  let mut rows = Vec::new();
  for record in reader.records() {
    rows.push(record?.iter().map(str::to_owned).collect());
  }
  Ok(rows)
}

/// Drop the first row if it looks like a header.
fn strip_header(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
  let is_header = rows
    .first()
    .and_then(|row| row.first())
    .map(|cell| cell.trim().to_lowercase())
    .is_some_and(|cell| HEADER_MARKERS.contains(&cell.as_str()));

  if is_header {
    rows.remove(0);
  }
  rows
}

fn row_to_raw(columns: &[String]) -> RawApplication {
  let col = |i: usize| columns.get(i).cloned();
  RawApplication {
    date:     col(0),
    company:  col(1),
    position: col(2),
    link:     col(3),
    status:   col(4),
    notes:    col(5),
  }
}

// ─── Import ──────────────────────────────────────────────────────────────────

/// Normalise and persist each row in order, after dropping a leading header
/// row if there is one.
pub async fn import_rows<S>(
  store: &S,
  clock: &dyn Clock,
  rows: Vec<Vec<String>>,
) -> Result<ImportReport, S::Error>
where
  S: ApplicationStore,
{
  let mut report = ImportReport::default();

  for (index, columns) in strip_header(rows).into_iter().enumerate() {
    let row = index + 1;

    if columns.len() < MIN_COLUMNS {
      tracing::warn!(row, fields = columns.len(), "skipping short CSV row");
      report.skipped.push(SkippedRow {
        row,
        reason: SkipReason::InsufficientColumns(columns.len()),
      });
      continue;
    }

    let normalized = match normalize(&row_to_raw(&columns), clock) {
      Ok(n) => n,
      Err(rejection) => {
        tracing::warn!(row, reason = rejection.code(), "skipping CSV row: {rejection}");
        report.skipped.push(SkippedRow {
          row,
          reason: SkipReason::Rejected(rejection),
        });
        continue;
      }
    };

    for warning in &normalized.warnings {
      tracing::warn!(row, "{warning}");
    }

    tracing::debug!(
      row,
      company = %normalized.application.company,
      position = %normalized.application.position,
      status = %normalized.application.status,
      "importing job application"
    );

    let record = store
      .create_with_timestamp(normalized.application, normalized.created_at)
      .await
      .inspect_err(|e| tracing::error!(row, error = %e, "failed to insert imported row"))?;

    report.imported.push(record);
  }

  Ok(report)
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::{DateTime, TimeZone, Utc};

  use super::*;
  use crate::{
    application::{NewJobApplication, Status},
    clock::FixedClock,
  };

  #[derive(Debug, thiserror::Error)]
  #[error("disk full")]
  struct DiskFull;

  /// Vec-backed store that can be told to fail after `capacity` inserts.
  #[derive(Default)]
  struct VecStore {
    rows:     Mutex<Vec<JobApplication>>,
    capacity: Option<usize>,
  }

  impl VecStore {
    fn insert(
      &self,
      input: NewJobApplication,
      created_at: DateTime<Utc>,
    ) -> Result<JobApplication, DiskFull> {
      let mut rows = self.rows.lock().unwrap();
      if self.capacity.is_some_and(|cap| rows.len() >= cap) {
        return Err(DiskFull);
      }
      let record =
        JobApplication::from_new(rows.len() as i64 + 1, input, created_at, created_at);
      rows.push(record.clone());
      Ok(record)
    }
  }

  impl ApplicationStore for VecStore {
    type Error = DiskFull;

    async fn create(&self, input: NewJobApplication) -> Result<JobApplication, DiskFull> {
      self.insert(input, Utc::now())
    }

    async fn create_with_timestamp(
      &self,
      input: NewJobApplication,
      created_at: DateTime<Utc>,
    ) -> Result<JobApplication, DiskFull> {
      self.insert(input, created_at)
    }

    async fn get(&self, id: i64) -> Result<Option<JobApplication>, DiskFull> {
      Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<JobApplication>, DiskFull> {
      Ok(self.rows.lock().unwrap().clone())
    }

    async fn update(
      &self,
      _id: i64,
      _input: NewJobApplication,
    ) -> Result<Option<JobApplication>, DiskFull> {
      Ok(None)
    }

    async fn delete(&self, id: i64) -> Result<(), DiskFull> {
      self.rows.lock().unwrap().retain(|r| r.id != id);
      Ok(())
    }
  }

  fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
  }

  fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap())
  }

  // ─── Header detection ──────────────────────────────────────────────────────

  #[test]
  fn header_row_is_dropped() {
    let rows = vec![
      row(&["date", "company", "position", "link", "status", "notes"]),
      row(&["2024-01-15", "Acme", "Engineer", ""]),
    ];
    let rows = strip_header(rows);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "Acme");
  }

  #[test]
  fn header_detection_ignores_case() {
    let rows = vec![row(&["Company", "Position", "x", "y"])];
    assert!(strip_header(rows).is_empty());
  }

  #[test]
  fn data_first_row_is_kept() {
    let rows = vec![row(&["2024-01-15", "Acme", "Engineer", ""])];
    assert_eq!(strip_header(rows).len(), 1);
    assert!(strip_header(Vec::new()).is_empty());
  }

  // ─── CSV decoding ──────────────────────────────────────────────────────────

  #[test]
  fn parse_csv_handles_quotes_and_ragged_rows() {
    let body = b"2024-01-15,Acme,Engineer,http://x,Interview,\"great, team\"\n\
                 2024-02-01,Globex,Analyst\n";
    let rows = parse_csv(body).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][5], "great, team");
    assert_eq!(rows[1].len(), 3);
  }

  #[test]
  fn parse_csv_rejects_invalid_utf8() {
    assert!(parse_csv(b"a,b,\xff\xfe,d\n").is_err());
  }

  // ─── Import ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn imports_full_row() {
    let store = VecStore::default();
    let rows = vec![row(&[
      "2024-01-15", "Acme", "Engineer", "http://x", "Interview", "great team",
    ])];

    let report = import_rows(&store, &clock(), rows).await.unwrap();
    assert_eq!(report.imported.len(), 1);
    let rec = &report.imported[0];
    assert_eq!(rec.status, Status::Interview);
    assert_eq!(rec.link, "http://x");
    assert_eq!(rec.notes, "great team");
    assert_eq!(rec.created_at, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
  }

  #[tokio::test]
  async fn leading_header_is_not_imported() {
    let store = VecStore::default();
    let rows = vec![
      row(&["date", "company", "position", "link", "status", "notes"]),
      row(&["2024-01-15", "Acme", "Engineer", "", "applied", ""]),
    ];

    let report = import_rows(&store, &clock(), rows).await.unwrap();
    assert!(report.skipped.is_empty());
    let companies: Vec<_> =
      store.list().await.unwrap().into_iter().map(|r| r.company).collect();
    assert_eq!(companies, ["Acme"]);
  }

  #[tokio::test]
  async fn short_rows_are_skipped() {
    let store = VecStore::default();
    let rows = vec![
      row(&["2024-01-15", "Acme", "Engineer"]),
      row(&["2024-01-16", "Globex", "Analyst", ""]),
    ];

    let report = import_rows(&store, &clock(), rows).await.unwrap();
    assert_eq!(report.imported.len(), 1);
    assert_eq!(report.imported[0].company, "Globex");
    assert_eq!(report.skipped, vec![SkippedRow {
      row:    1,
      reason: SkipReason::InsufficientColumns(3),
    }]);
    assert_eq!(report.skipped[0].reason.code(), "insufficient_columns");
  }

  #[tokio::test]
  async fn rejected_row_does_not_abort_batch() {
    let store = VecStore::default();
    let rows = vec![
      row(&["2024-01-15", "Acme", "Engineer", ""]),
      row(&["2024-01-16", "", "Analyst", ""]),
      row(&["2024-01-17", "Initech", "Developer", ""]),
    ];

    let report = import_rows(&store, &clock(), rows).await.unwrap();
    let companies: Vec<_> =
      report.imported.iter().map(|r| r.company.as_str()).collect();
    assert_eq!(companies, ["Acme", "Initech"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].row, 2);
    assert_eq!(report.skipped[0].reason.code(), "missing_required_field");
    assert_eq!(store.list().await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn store_failure_aborts_but_keeps_earlier_rows() {
    let store = VecStore { capacity: Some(1), ..Default::default() };
    let rows = vec![
      row(&["2024-01-15", "Acme", "Engineer", ""]),
      row(&["2024-01-16", "Globex", "Analyst", ""]),
      row(&["2024-01-17", "Initech", "Developer", ""]),
    ];

    let result = import_rows(&store, &clock(), rows).await;
    assert!(result.is_err());
    let kept = store.list().await.unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].company, "Acme");
  }
}
