//! Source pixels and the preparation applied before quantization.
//!
//! The core never decodes files. Hosts hand over a decoded RGBA raster as a
//! [`PixelBuffer`]; [`resize_to_fit`] optionally shrinks it so the longest
//! side stays within a working budget (large sources produce an unbounded
//! number of strokes otherwise).

mod buffer;
mod resize;

pub use buffer::{PixelBuffer, PixelBufferError, TRANSPARENCY_THRESHOLD};
pub use resize::{resize_to_fit, DEFAULT_MAX_DIMENSION};
