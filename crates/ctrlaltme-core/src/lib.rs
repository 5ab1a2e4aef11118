//! Core types and trait definitions for the ctrl-alt-me job tracker.
//!
//! This crate is free of HTTP and database dependencies. The storage backend
//! (`ctrlaltme-store-sqlite`) and the HTTP layer (`ctrlaltme-api`) both depend
//! on it.

pub mod application;
pub mod clock;
pub mod error;
pub mod ingest;
pub mod normalize;
pub mod store;

pub use error::{Error, Result};
