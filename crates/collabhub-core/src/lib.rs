#![forbid(unsafe_code)]
//! collabhub-core library.
//!
//! Shared types for the collaboration-hub pipeline: configuration, error
//! codes, the work record model, the record fetcher seam, and id input
//! parsing.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums per concern, each mapping to an
//!   [`error::ErrorCode`]; `anyhow::Result` at the edges.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod fetch;
pub mod input;
pub mod model;

pub use config::{AnalysisConfig, CollabConfig, RunMode};
pub use error::ErrorCode;
pub use fetch::{FetchError, OpenAlexClient, RecordSet, WorkSource};
pub use model::{AuthorAffiliation, Authorship, UNKNOWN_INSTITUTION, WorkRecord};
