//! Dithering options and configuration.

/// Upper bound on the error diffusion scale.
pub const MAX_STRENGTH: f64 = 4.0;

/// Configuration for error diffusion.
///
/// # Example
///
/// ```
/// use raster_strokes::DitherOptions;
///
/// let plain = DitherOptions::new().strength(0.0);
/// assert!(!plain.diffuses());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DitherOptions {
    /// Multiplier on every kernel weight. `1.0` is standard Floyd-Steinberg,
    /// `0.0` disables diffusion (plain nearest-color quantization).
    ///
    /// Default: `1.0`
    pub strength: f64,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self { strength: 1.0 }
    }
}

impl DitherOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diffusion scale, clamped into `0.0..=4.0`. Non-finite values
    /// reset to the default.
    #[inline]
    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = if strength.is_finite() {
            strength.clamp(0.0, MAX_STRENGTH)
        } else {
            1.0
        };
        self
    }

    /// Build options from a percentage (100 = standard).
    #[inline]
    pub fn from_percent(percent: f64) -> Self {
        Self::new().strength(percent / 100.0)
    }

    /// Whether any error is propagated.
    #[inline]
    pub fn diffuses(&self) -> bool {
        self.strength > 0.0
    }
}
