use raster_strokes::output::MS_PER_STROKE;
use raster_strokes::preprocess::DEFAULT_MAX_DIMENSION;
use raster_strokes::{EffectOptions, Rgb8, StyleConfig, SurfaceSize};
use serde::Deserialize;
use std::path::Path;

/// Application configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Planner style used when a request does not override it
    pub style: StyleConfig,

    /// Palette size budget
    pub max_colors: usize,

    /// Longest image side after downscaling
    pub max_dimension: usize,

    /// Pause between streamed strokes
    pub stroke_delay_ms: u64,

    /// Default drawing surface size in pixels
    pub surface: SurfaceConfig,

    /// Defaults for generative effects
    pub effect: EffectConfig,
}

/// Effect defaults: the pattern knobs plus a stroke color
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EffectConfig {
    #[serde(flatten)]
    pub options: EffectOptions,
    /// Stroke color as #rrggbb
    pub color: String,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            options: EffectOptions::default(),
            color: Rgb8::BLACK.to_hex(),
        }
    }
}

impl EffectConfig {
    /// Parsed stroke color; an invalid value falls back to black.
    pub fn color(&self) -> Rgb8 {
        self.color.parse::<Rgb8>().unwrap_or_else(|e| {
            tracing::warn!(%e, color = %self.color, "Invalid effect color, using black");
            Rgb8::BLACK
        })
    }
}

/// Drawing surface dimensions
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

impl From<SurfaceConfig> for SurfaceSize {
    fn from(s: SurfaceConfig) -> Self {
        SurfaceSize::new(s.width, s.height)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
            max_colors: raster_strokes::palette::MAX_PALETTE_SIZE,
            max_dimension: DEFAULT_MAX_DIMENSION,
            stroke_delay_ms: MS_PER_STROKE,
            surface: SurfaceConfig::default(),
            effect: EffectConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config.sanitized())
    }

    /// Load configuration from a file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file given, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        max_colors = config.max_colors,
                        max_dimension = config.max_dimension,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Clamp numeric settings into usable ranges
    pub fn sanitized(mut self) -> Self {
        self.style = self.style.sanitized();
        self.max_colors = self
            .max_colors
            .clamp(1, raster_strokes::palette::MAX_PALETTE_SIZE);
        self.max_dimension = self.max_dimension.max(1);
        self.effect.options = self.effect.options.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use raster_strokes::{DetailMode, PaletteOrder};
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.max_colors, 1300);
        assert_eq!(config.max_dimension, 500);
        assert_eq!(config.stroke_delay_ms, 8);
        assert_eq!(config.surface, SurfaceConfig::default());
        assert_eq!(config.style, StyleConfig::default());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
max_colors: 64
stroke_delay_ms: 2
surface:
  width: 1024
  height: 768
style:
  smoothness: 80
  detailMode: max
  paletteOrder: coverage
  textureWeave: true
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.max_colors, 64);
        assert_eq!(config.max_dimension, 500);
        assert_eq!(config.stroke_delay_ms, 2);
        assert_eq!(config.surface.width, 1024);
        assert_eq!(config.style.smoothness, 80.0);
        assert_eq!(config.style.detail_mode, DetailMode::Max);
        assert_eq!(config.style.palette_order, PaletteOrder::Coverage);
        assert!(config.style.texture_weave);
        assert!(config.style.gradient_echo);
    }

    #[test]
    fn test_parse_effect_defaults() {
        let yaml = "effect:\n  density: 500\n  mirror: false\n  seed: 12\n  color: \"#336699\"\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.effect.options.density, 120.0);
        assert_eq!(config.effect.options.tempo, 60.0);
        assert!(!config.effect.options.mirror);
        assert_eq!(config.effect.options.seed, Some(12));
        assert_eq!(config.effect.color(), Rgb8::new(0x33, 0x66, 0x99));
    }

    #[test]
    fn test_bad_effect_color_is_black() {
        let effect = EffectConfig {
            color: "chartreuse".to_string(),
            ..EffectConfig::default()
        };
        assert_eq!(effect.color(), Rgb8::BLACK);
    }

    #[test]
    fn test_parse_clamps_values() {
        let yaml = "max_colors: 0\nstyle:\n  laneDensity: 1\n";
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.max_colors, 1);
        assert_eq!(config.style.lane_density, 10.0);
    }

    #[test]
    fn test_load_invalid_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "style: [not, a, map]").unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_unknown_mode_keeps_valid_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "max_colors: 64\nsurface:\n  width: 1024\n  height: 768\nstyle:\n  detailMode: ultra\n  paletteOrder: upside-down\n  smoothness: 80\n"
        )
        .unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config.max_colors, 64);
        assert_eq!(config.surface.width, 1024);
        assert_eq!(config.surface.height, 768);
        assert_eq!(config.style.smoothness, 80.0);
        assert_eq!(config.style.detail_mode, DetailMode::Balanced);
        assert_eq!(config.style.palette_order, PaletteOrder::DarkFirst);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("missing.yaml")));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_dimension: 120").unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config.max_dimension, 120);
    }
}
