//! Color types and perceptual measurements.
//!
//! Everything in the stroke compiler works on 8-bit sRGB triples. There is no
//! gamma decoding: palette construction, error diffusion and distance
//! comparisons all operate on the raw channel values, which is what the
//! drawing surface ultimately receives as hex text.
//!
//! # Example
//!
//! ```
//! use raster_strokes::{ColorProfile, Rgb8};
//!
//! let teal: Rgb8 = "#008080".parse().unwrap();
//! assert_eq!(teal.to_hex(), "#008080");
//!
//! let profile = ColorProfile::of(teal);
//! assert!(profile.saturation > 0.99);
//! ```

mod profile;
mod rgb;

pub use profile::{perceptual_distance, ColorProfile};
pub use rgb::Rgb8;
