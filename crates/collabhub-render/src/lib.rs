#![forbid(unsafe_code)]
//! collabhub-render library.
//!
//! Rasterizes a [`RenderScene`](collabhub_triage::style::RenderScene) to PNG.
//! This crate only draws: positions, sizes, colors, and label text all come
//! from the scene.
//!
//! # Conventions
//!
//! - **Errors**: [`RenderError`], mapped to
//!   [`ErrorCode::RenderFailed`](collabhub_core::ErrorCode::RenderFailed).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod canvas;
pub mod font;
pub mod png;

pub use canvas::{RenderOptions, draw_scene};
pub use png::{RenderError, encode_base64, render_png};
