#![forbid(unsafe_code)]
//! collabhub-triage library.
//!
//! Builds the co-authorship graph, scores every author, picks the hubs, lays
//! the graph out, and describes the picture to draw.
//!
//! # Conventions
//!
//! - **Errors**: Stages here do not fail; degenerate input (empty graph,
//!   non-converging eigenvector) yields well-defined empty or zero results.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod analysis;
pub mod graph;
pub mod layout;
pub mod metrics;
pub mod score;
pub mod style;
pub mod summary;

pub use analysis::{Analysis, analyze};
pub use graph::{BuildOptions, BuiltGraph, CollabGraph, FetchReport, GraphBuilder, build_graph};
pub use score::{AuthorScore, HubScores};
pub use style::RenderScene;
pub use summary::Summary;
