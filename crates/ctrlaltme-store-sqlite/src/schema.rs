//! SQL schema for the job-application store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS job_applications (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    company     TEXT NOT NULL,
    position    TEXT NOT NULL,
    link        TEXT NOT NULL DEFAULT '',
    status      TEXT NOT NULL DEFAULT 'applied',  -- 'applied' | 'interview' | 'offer' | 'rejected'
    notes       TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,                     -- RFC 3339 UTC; never updated
    updated_at  TEXT NOT NULL                      -- RFC 3339 UTC
);
";

/// Column list shared by every `SELECT` and `RETURNING` clause; the order
/// matches [`crate::encode::RawApplication::from_row`].
pub const COLUMNS: &str =
  "id, company, position, link, status, notes, created_at, updated_at";
