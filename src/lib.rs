//! AutoDraw - turn raster images into timed stroke commands
//!
//! Host application around the `raster-strokes` pipeline: PNG loading,
//! YAML configuration, a CLI and an HTTP API.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
