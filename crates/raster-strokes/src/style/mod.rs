//! Planner style settings.
//!
//! [`StyleConfig`] is an immutable record passed into every planning call.
//! Percentages arrive from outside (YAML, query strings, CLI flags) and are
//! only trusted after [`StyleConfig::sanitized`].

mod mode;

pub use mode::{DetailMode, PaletteOrder, ParseModeError};

use serde::{Deserialize, Serialize};

const DEFAULT_SMOOTHNESS: f64 = 40.0;
const DEFAULT_LANE_DENSITY: f64 = 100.0;
const DEFAULT_COVERAGE_PAD: f64 = 100.0;
const DEFAULT_DITHER_STRENGTH: f64 = 100.0;
const DEFAULT_SPECTRAL_ACCENT: f64 = 120.0;

/// Settings that shape stroke planning for one run.
///
/// # Example
///
/// ```
/// use raster_strokes::{DetailMode, StyleConfig};
///
/// let style: StyleConfig =
///     serde_json::from_str(r#"{"laneDensity": 5000, "detailMode": "max"}"#).unwrap();
/// let style = style.sanitized();
/// assert_eq!(style.lane_density, 400.0);
/// assert_eq!(style.detail_mode, DetailMode::Max);
/// assert_eq!(style.smoothness, 40.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    /// Widens lane spacing divisor; percent.
    pub smoothness: f64,
    /// Lane fan density; percent.
    pub lane_density: f64,
    /// Horizontal run padding boost; percent.
    pub coverage_pad: f64,
    /// Error diffusion strength; percent (100 = Floyd-Steinberg).
    pub dither_strength: f64,
    #[serde(deserialize_with = "mode::deserialize_lenient")]
    pub detail_mode: DetailMode,
    /// Force extra lanes when the image is drawn small.
    pub low_res_enhancer: bool,
    pub edge_emphasis: bool,
    pub micro_detail: bool,
    /// Weighs glaze and weave layers; percent.
    pub spectral_accent: f64,
    pub highlight_glaze: bool,
    pub texture_weave: bool,
    pub gradient_echo: bool,
    #[serde(deserialize_with = "mode::deserialize_lenient")]
    pub palette_order: PaletteOrder,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            smoothness: DEFAULT_SMOOTHNESS,
            lane_density: DEFAULT_LANE_DENSITY,
            coverage_pad: DEFAULT_COVERAGE_PAD,
            dither_strength: DEFAULT_DITHER_STRENGTH,
            detail_mode: DetailMode::Balanced,
            low_res_enhancer: true,
            edge_emphasis: true,
            micro_detail: true,
            spectral_accent: DEFAULT_SPECTRAL_ACCENT,
            highlight_glaze: true,
            texture_weave: false,
            gradient_echo: true,
            palette_order: PaletteOrder::DarkFirst,
        }
    }
}

fn clamp_percent(value: f64, min: f64, max: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}

impl StyleConfig {
    /// Copy with every percentage clamped into its valid range.
    ///
    /// Non-finite values are replaced by the default.
    pub fn sanitized(&self) -> Self {
        Self {
            smoothness: clamp_percent(self.smoothness, 0.0, 400.0, DEFAULT_SMOOTHNESS),
            lane_density: clamp_percent(self.lane_density, 10.0, 400.0, DEFAULT_LANE_DENSITY),
            coverage_pad: clamp_percent(self.coverage_pad, 10.0, 400.0, DEFAULT_COVERAGE_PAD),
            dither_strength: clamp_percent(
                self.dither_strength,
                0.0,
                400.0,
                DEFAULT_DITHER_STRENGTH,
            ),
            spectral_accent: clamp_percent(
                self.spectral_accent,
                10.0,
                400.0,
                DEFAULT_SPECTRAL_ACCENT,
            ),
            ..self.clone()
        }
    }

    /// Structured cache key component covering every field that affects
    /// planned geometry or order.
    pub fn signature(&self) -> StyleSignature {
        let s = self.sanitized();
        StyleSignature {
            smoothness: s.smoothness.to_bits(),
            lane_density: s.lane_density.to_bits(),
            coverage_pad: s.coverage_pad.to_bits(),
            spectral_accent: s.spectral_accent.to_bits(),
            detail_mode: s.detail_mode,
            palette_order: s.palette_order,
            flags: [
                s.low_res_enhancer,
                s.edge_emphasis,
                s.micro_detail,
                s.highlight_glaze,
                s.texture_weave,
                s.gradient_echo,
            ],
        }
    }
}

/// Hashable snapshot of a sanitized [`StyleConfig`].
///
/// Dither strength is left out: it is applied when the assignment map is
/// built, and a new map always invalidates cached plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleSignature {
    smoothness: u64,
    lane_density: u64,
    coverage_pad: u64,
    spectral_accent: u64,
    detail_mode: DetailMode,
    palette_order: PaletteOrder,
    flags: [bool; 6],
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let style = StyleConfig::default();
        assert_eq!(style.smoothness, 40.0);
        assert_eq!(style.lane_density, 100.0);
        assert_eq!(style.coverage_pad, 100.0);
        assert_eq!(style.dither_strength, 100.0);
        assert_eq!(style.detail_mode, DetailMode::Balanced);
        assert!(style.low_res_enhancer);
        assert!(style.edge_emphasis);
        assert!(style.micro_detail);
        assert_eq!(style.spectral_accent, 120.0);
        assert!(style.highlight_glaze);
        assert!(!style.texture_weave);
        assert!(style.gradient_echo);
        assert_eq!(style.palette_order, PaletteOrder::DarkFirst);
    }

    #[test]
    fn test_sanitized_clamps_and_replaces_nan() {
        let style = StyleConfig {
            smoothness: -5.0,
            lane_density: 1.0,
            coverage_pad: 9000.0,
            dither_strength: f64::NAN,
            spectral_accent: f64::INFINITY,
            ..StyleConfig::default()
        }
        .sanitized();
        assert_eq!(style.smoothness, 0.0);
        assert_eq!(style.lane_density, 10.0);
        assert_eq!(style.coverage_pad, 400.0);
        assert_eq!(style.dither_strength, 100.0);
        assert_eq!(style.spectral_accent, 120.0);
    }

    #[test]
    fn test_deserialize_partial_uses_defaults() {
        let style: StyleConfig = serde_json::from_str(
            r#"{"textureWeave": true, "paletteOrder": "light-first", "edgeEmphasis": false}"#,
        )
        .unwrap();
        assert!(style.texture_weave);
        assert!(!style.edge_emphasis);
        assert_eq!(style.palette_order, PaletteOrder::LightFirst);
        assert_eq!(style.smoothness, 40.0);
    }

    #[test]
    fn test_deserialize_unknown_mode_keeps_other_fields() {
        let style: StyleConfig = serde_json::from_str(
            r#"{"detailMode": "ultra", "paletteOrder": "sideways", "smoothness": 80, "textureWeave": true}"#,
        )
        .unwrap();
        assert_eq!(style.detail_mode, DetailMode::Balanced);
        assert_eq!(style.palette_order, PaletteOrder::DarkFirst);
        assert_eq!(style.smoothness, 80.0);
        assert!(style.texture_weave);
    }

    #[test]
    fn test_deserialize_mode_names_case_insensitive() {
        let style: StyleConfig =
            serde_json::from_str(r#"{"detailMode": "MAX", "paletteOrder": "Coverage"}"#).unwrap();
        assert_eq!(style.detail_mode, DetailMode::Max);
        assert_eq!(style.palette_order, PaletteOrder::Coverage);
    }

    #[test]
    fn test_signature_tracks_sanitized_values() {
        let a = StyleConfig {
            lane_density: 500.0,
            ..StyleConfig::default()
        };
        let b = StyleConfig {
            lane_density: 400.0,
            ..StyleConfig::default()
        };
        assert_eq!(a.signature(), b.signature());

        let c = StyleConfig {
            gradient_echo: false,
            ..StyleConfig::default()
        };
        assert_ne!(a.signature(), c.signature());
    }

    #[test]
    fn test_signature_ignores_dither_strength() {
        let a = StyleConfig::default();
        let b = StyleConfig {
            dither_strength: 0.0,
            ..StyleConfig::default()
        };
        assert_eq!(a.signature(), b.signature());
    }
}
