//! ctrl-alt-me server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `CTRLALTME_*`
//! environment variables, opens the SQLite store, and serves the API and the
//! frontend over HTTP until SIGINT/SIGTERM.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use ctrlaltme_core::clock::SystemClock;
use ctrlaltme_server::{AppState, ServerConfig, logging};
use ctrlaltme_store_sqlite::SqliteStore;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about = "Job application tracker server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  let _log_guard = logging::init(&server_cfg)?;
  tracing::debug!(?server_cfg, "configuration loaded");

  let store = SqliteStore::open(&server_cfg.database_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.database_path)
    })?;

  let state = AppState {
    store:  Arc::new(store.clone()),
    clock:  Arc::new(SystemClock),
    config: Arc::new(server_cfg.clone()),
  };

  let app = ctrlaltme_server::router(state);
  let address = server_cfg.address();

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("Listening on http://{address}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped, closing database");
  store.close().await.context("failed to close database")?;
  Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to install SIGTERM handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
  tracing::info!("shutdown signal received");
}
