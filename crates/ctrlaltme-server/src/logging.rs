//! Tracing setup.
//!
//! Events go to stdout (text or JSON, per `log_format`) and, unless
//! `log_to_file` is off, to a daily-rotated JSON file
//! `<log_dir>/app.YYYY-MM-DD.log`. Timestamps are RFC 3339 in UTC. The level
//! defaults to `INFO` and can be overridden with `RUST_LOG`.

use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_appender::{
  non_blocking::WorkerGuard,
  rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
  EnvFilter, Layer as _, fmt, layer::SubscriberExt as _,
  util::SubscriberInitExt as _,
};

use crate::ServerConfig;

/// Prefix of the rotated log file names.
pub const LOG_FILE_PREFIX: &str = "app";

/// Format of the stdout log stream. The file is always JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  #[default]
  Text,
  Json,
}

/// Daily-rotated appender writing to `dir`, which is created if missing.
pub fn file_appender(dir: &Path) -> anyhow::Result<RollingFileAppender> {
  std::fs::create_dir_all(dir)
    .with_context(|| format!("failed to create log directory {dir:?}"))?;

  RollingFileAppender::builder()
    .rotation(Rotation::DAILY)
    .filename_prefix(LOG_FILE_PREFIX)
    .filename_suffix("log")
    .build(dir)
    .with_context(|| format!("failed to open log file in {dir:?}"))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held until
/// the process exits.
pub fn init(config: &ServerConfig) -> anyhow::Result<Option<WorkerGuard>> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  let stdout = match config.log_format {
    LogFormat::Text => fmt::layer().boxed(),
    LogFormat::Json => fmt::layer().json().boxed(),
  };

  let (file, guard) = if config.log_to_file {
    let (writer, guard) = tracing_appender::non_blocking(file_appender(&config.log_dir)?);
    let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
    (Some(layer), Some(guard))
  } else {
    (None, None)
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(stdout)
    .with(file)
    .try_init()
    .context("failed to install tracing subscriber")?;

  if config.log_to_file {
    tracing::info!(log_dir = ?config.log_dir, "writing JSON logs to file");
  }
  Ok(guard)
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn file_appender_creates_directory_and_dated_file() {
    let dir = std::env::temp_dir()
      .join(format!("ctrlaltme-logs-{}", std::process::id()))
      .join("nested");
    let _ = std::fs::remove_dir_all(&dir);

    let mut appender = file_appender(&dir).unwrap();
    appender.write_all(b"{\"msg\":\"hello\"}\n").unwrap();
    appender.flush().unwrap();

    let names: Vec<String> = std::fs::read_dir(&dir)
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    assert_eq!(names.len(), 1);
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    assert_eq!(names[0], format!("{LOG_FILE_PREFIX}.{today}.log"));

    let _ = std::fs::remove_dir_all(&dir);
  }

  #[test]
  fn log_format_deserializes_lowercase() {
    let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
    assert_eq!(format, LogFormat::Json);
    assert_eq!(LogFormat::default(), LogFormat::Text);
  }
}
