//! Perceptual attributes of a single color.

use super::rgb::Rgb8;

/// Brightness and colorfulness measurements for one color.
///
/// All fields are in `0.0..=1.0`. The planner uses `value` to decide on the
/// highlight glaze, `saturation` for the texture weave and `luminance` for
/// palette ordering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorProfile {
    /// Rec. 709 relative luminance of the raw channel values.
    pub luminance: f64,
    /// HSV saturation: `(max - min) / max`, zero for black.
    pub saturation: f64,
    /// HSV value: the largest channel.
    pub value: f64,
    /// HSL lightness: midpoint of the largest and smallest channel.
    pub lightness: f64,
}

impl ColorProfile {
    /// Measure a color.
    ///
    /// # Example
    /// ```
    /// use raster_strokes::{ColorProfile, Rgb8};
    ///
    /// let white = ColorProfile::of(Rgb8::WHITE);
    /// assert!((white.luminance - 1.0).abs() < 1e-9);
    /// assert_eq!(white.saturation, 0.0);
    /// ```
    pub fn of(color: Rgb8) -> Self {
        let [r, g, b] = color.to_f64().map(|c| c / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;
        let saturation = if max == 0.0 { 0.0 } else { chroma / max };

        Self {
            luminance: 0.2126 * r + 0.7152 * g + 0.0722 * b,
            saturation,
            value: max,
            lightness: (max + min) / 2.0,
        }
    }
}

/// Weighted squared RGB distance ("redmean" approximation).
///
/// Red and blue are weighted by how red the pair is on average, green is
/// weighted 4x:
///
/// ```text
/// (2 + rMean/256)·dR² + 4·dG² + (2 + (255 − rMean)/256)·dB²
/// ```
///
/// Used both for nearest-palette matching and for the detail mask, so the
/// two agree on what "different" means.
#[inline]
pub fn perceptual_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let r_mean = (a[0] + b[0]) / 2.0;
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (2.0 + r_mean / 256.0) * dr * dr + 4.0 * dg * dg + (2.0 + (255.0 - r_mean) / 256.0) * db * db
}
