//! HTTP front door for the job tracker.
//!
//! Mounts the JSON API under `/api`, answers `/ping`, and serves the built
//! single-page app from a static directory, falling back to `index.html` for
//! client-side routes.

pub mod logging;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
  routing::get,
};
use ctrlaltme_api::{ApiState, api_router};
use ctrlaltme_core::{clock::Clock, store::ApplicationStore};
use serde::Deserialize;
use tower::ServiceBuilder;

use crate::logging::LogFormat;
use tower_http::{
  cors::CorsLayer,
  services::{ServeDir, ServeFile},
  timeout::TimeoutLayer,
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CTRLALTME_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub database_path:        PathBuf,
  /// Directory holding the built frontend (`index.html` and assets).
  pub static_dir:           PathBuf,
  /// Host and port of the frontend dev server, allowed through CORS.
  pub frontend_host:        String,
  pub frontend_port:        u16,
  pub request_timeout_secs: u64,
  /// Format of the stdout log stream.
  pub log_format:           LogFormat,
  /// Also write JSON logs to a daily file under `log_dir`.
  pub log_to_file:          bool,
  pub log_dir:              PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "0.0.0.0".to_string(),
      port:                 3000,
      database_path:        PathBuf::from("data/job_applications.db"),
      static_dir:           PathBuf::from("frontend/dist"),
      frontend_host:        "localhost".to_string(),
      frontend_port:        5173,
      request_timeout_secs: 5,
      log_format:           LogFormat::Text,
      log_to_file:          true,
      log_dir:              PathBuf::from("logs"),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `CTRLALTME_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CTRLALTME").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The origin the frontend is served from during development.
  pub fn frontend_origin(&self) -> String {
    format!("http://{}:{}", self.frontend_host, self.frontend_port)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub clock:  Arc<dyn Clock>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      clock:  self.clock.clone(),
      config: self.config.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ApplicationStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let config = state.config.clone();
  let api = api_router(ApiState {
    store: state.store,
    clock: state.clock,
  });

  let index = config.static_dir.join("index.html");
  let spa = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

  Router::new()
    .route("/ping", get(ping))
    .nest("/api", api)
    .fallback_service(spa)
    .layer(
      ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
    )
}

async fn ping() -> &'static str {
  tracing::debug!("ping");
  "pong"
}

/// Allow the frontend dev server to call the API.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
  let origins: Vec<HeaderValue> = [config.frontend_origin()]
    .iter()
    .filter_map(|origin| origin.parse().ok())
    .collect();

  CorsLayer::new()
    .allow_origin(origins)
    .allow_methods([
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::DELETE,
      Method::OPTIONS,
    ])
    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    .max_age(Duration::from_secs(3600))
}

// ─── Integration tests ────────────────────────────────────────────────────────
