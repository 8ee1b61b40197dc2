//! Palette construction and lookup.
//!
//! [`build_palette`] reduces the distinct colors of a [`PixelBuffer`] to at
//! most K representatives with a population-weighted median cut. The
//! resulting [`Palette`] is frozen: the ditherer and planner only read it.
//!
//! [`PixelBuffer`]: crate::PixelBuffer

mod builder;
mod error;
mod palette;

pub use builder::{
    build_palette, collect_samples, palette_from_samples, ColorSample, MAX_PALETTE_SIZE,
};
pub use error::ParseColorError;
pub use palette::{Palette, PaletteEntry};
