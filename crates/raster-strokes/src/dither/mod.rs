//! Error diffusion onto a frozen palette.
//!
//! The ditherer walks the raster in serpentine order (even rows left to
//! right, odd rows right to left), snaps each opaque pixel to its nearest
//! palette color and pushes the rounding error into pixels not yet visited.
//! Transparent pixels get [`AssignmentMap::SKIP`] and neither emit nor absorb
//! error.
//!
//! # Example
//!
//! ```
//! use raster_strokes::{Dither, DitherOptions, FloydSteinberg, Palette, PixelBuffer, Rgb8};
//!
//! let palette = Palette::new(vec![Rgb8::BLACK, Rgb8::WHITE]);
//! let buffer = PixelBuffer::from_rgb(4, 1, &[Rgb8::new(128, 128, 128); 4]).unwrap();
//! let map = FloydSteinberg.dither(&buffer, &palette, &DitherOptions::new());
//! assert_eq!(map.assigned_count(), 4);
//! ```

mod assignment;
mod floyd_steinberg;
mod kernel;
mod options;

pub use assignment::{AssignmentMap, AssignmentMapError};
pub use floyd_steinberg::{dither_with_kernel, nearest_assignment, FloydSteinberg};
pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use options::DitherOptions;

use crate::palette::Palette;
use crate::preprocess::PixelBuffer;

/// An algorithm that maps every pixel of a buffer onto a palette.
pub trait Dither {
    /// Produce one palette index (or [`AssignmentMap::SKIP`]) per pixel.
    ///
    /// Implementations must be deterministic: identical inputs yield
    /// identical maps.
    fn dither(
        &self,
        buffer: &PixelBuffer,
        palette: &Palette,
        options: &DitherOptions,
    ) -> AssignmentMap;
}
