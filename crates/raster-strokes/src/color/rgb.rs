//! 8-bit RGB color type with hex text conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::palette::ParseColorError;

/// An opaque 8-bit sRGB color.
///
/// This is the unit the whole pipeline trades in: observed pixel colors,
/// palette entries and the color attached to every emitted stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb8 {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb8 {
    /// Black, used for the fallback palette.
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);

    /// White.
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    /// Create a color from its three channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from floating point channels, rounding and clamping
    /// each one into `0..=255`.
    #[inline]
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: round_channel(r),
            g: round_channel(g),
            b: round_channel(b),
        }
    }

    /// Channels as `f64`, in the order `[r, g, b]`.
    #[inline]
    pub fn to_f64(self) -> [f64; 3] {
        [self.r as f64, self.g as f64, self.b as f64]
    }

    /// Lowercase `#rrggbb` text.
    ///
    /// # Example
    /// ```
    /// use raster_strokes::Rgb8;
    /// assert_eq!(Rgb8::new(255, 8, 171).to_hex(), "#ff08ab");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Blend towards `target` by `amount` (clamped to `0.0..=1.0`).
    pub fn mix(self, target: Rgb8, amount: f64) -> Rgb8 {
        let ratio = amount.clamp(0.0, 1.0);
        let inv = 1.0 - ratio;
        let [r0, g0, b0] = self.to_f64();
        let [r1, g1, b1] = target.to_f64();
        Rgb8::from_f64(
            r0 * inv + r1 * ratio,
            g0 * inv + g1 * ratio,
            b0 * inv + b1 * ratio,
        )
    }

    /// Blend towards white.
    #[inline]
    pub fn lighten(self, amount: f64) -> Rgb8 {
        self.mix(Rgb8::WHITE, amount)
    }

    /// Blend towards black.
    #[inline]
    pub fn darken(self, amount: f64) -> Rgb8 {
        self.mix(Rgb8::BLACK, amount)
    }
}

#[inline]
fn round_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl FromStr for Rgb8 {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`, case-insensitive,
    /// surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
