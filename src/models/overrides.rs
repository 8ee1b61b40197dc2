//! Per-request adjustments layered over the configured style.

use raster_strokes::{
    DetailMode, EffectOptions, PaletteOrder, ParseColorError, Region, Rgb8, StyleConfig,
};
use serde::Deserialize;

/// Optional style fields accepted as CLI flags and HTTP query parameters
#[derive(Debug, Default, Clone, Deserialize, clap::Args)]
pub struct StyleOverrides {
    /// Lane smoothing in percent
    #[arg(long)]
    pub smoothness: Option<f64>,

    /// Lane density in percent
    #[arg(long)]
    pub lane_density: Option<f64>,

    /// Run padding boost in percent
    #[arg(long)]
    pub coverage_pad: Option<f64>,

    /// Error diffusion strength in percent (0 disables dithering)
    #[arg(long)]
    pub dither_strength: Option<f64>,

    /// Detail accents: balanced, max or minimal
    #[arg(long)]
    pub detail_mode: Option<String>,

    /// Extra lanes for small renderings
    #[arg(long)]
    pub low_res_enhancer: Option<bool>,

    /// Accent strokes along color boundaries
    #[arg(long)]
    pub edge_emphasis: Option<bool>,

    /// Short accents for tiny runs
    #[arg(long)]
    pub micro_detail: Option<bool>,

    /// Glaze and weave weighting in percent
    #[arg(long)]
    pub spectral_accent: Option<f64>,

    /// Highlight strokes above and below bright runs
    #[arg(long)]
    pub highlight_glaze: Option<bool>,

    /// Diagonal texture on saturated runs
    #[arg(long)]
    pub texture_weave: Option<bool>,

    /// Echo strokes around detailed runs
    #[arg(long)]
    pub gradient_echo: Option<bool>,

    /// Group order: dark-first, light-first or coverage
    #[arg(long)]
    pub palette_order: Option<String>,
}

impl StyleOverrides {
    /// Apply every set field on top of `base`.
    ///
    /// Unknown mode names fall back to the default with a warning.
    pub fn apply(&self, base: &StyleConfig) -> StyleConfig {
        let mut style = base.clone();
        if let Some(v) = self.smoothness {
            style.smoothness = v;
        }
        if let Some(v) = self.lane_density {
            style.lane_density = v;
        }
        if let Some(v) = self.coverage_pad {
            style.coverage_pad = v;
        }
        if let Some(v) = self.dither_strength {
            style.dither_strength = v;
        }
        if let Some(v) = &self.detail_mode {
            style.detail_mode = DetailMode::parse_lenient(v);
        }
        if let Some(v) = self.low_res_enhancer {
            style.low_res_enhancer = v;
        }
        if let Some(v) = self.edge_emphasis {
            style.edge_emphasis = v;
        }
        if let Some(v) = self.micro_detail {
            style.micro_detail = v;
        }
        if let Some(v) = self.spectral_accent {
            style.spectral_accent = v;
        }
        if let Some(v) = self.highlight_glaze {
            style.highlight_glaze = v;
        }
        if let Some(v) = self.texture_weave {
            style.texture_weave = v;
        }
        if let Some(v) = self.gradient_echo {
            style.gradient_echo = v;
        }
        if let Some(v) = &self.palette_order {
            style.palette_order = PaletteOrder::parse_lenient(v);
        }
        style.sanitized()
    }
}

/// Optional effect fields accepted as CLI flags and HTTP query parameters
#[derive(Debug, Default, Clone, Deserialize, clap::Args)]
pub struct EffectOverrides {
    /// Pattern density (10-120)
    #[arg(long)]
    pub density: Option<f64>,

    /// Replay speed (10-160)
    #[arg(long)]
    pub tempo: Option<f64>,

    /// Add a mirrored pass after each path
    #[arg(long)]
    pub mirror: Option<bool>,

    /// Perturb the curves
    #[arg(long)]
    pub jitter: Option<bool>,

    /// Seed for the random parts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stroke color as #rrggbb or #rgb
    #[arg(long)]
    pub color: Option<String>,
}

impl EffectOverrides {
    pub fn apply(&self, base: &EffectOptions) -> EffectOptions {
        let mut options = base.clone();
        if let Some(v) = self.density {
            options.density = v;
        }
        if let Some(v) = self.tempo {
            options.tempo = v;
        }
        if let Some(v) = self.mirror {
            options.mirror = v;
        }
        if let Some(v) = self.jitter {
            options.jitter = v;
        }
        if self.seed.is_some() {
            options.seed = self.seed;
        }
        options.sanitized()
    }

    /// The requested color, or `fallback` when none was given.
    pub fn color_or(&self, fallback: Rgb8) -> Result<Rgb8, ParseColorError> {
        match &self.color {
            Some(hex) => hex.parse(),
            None => Ok(fallback),
        }
    }
}

/// Parse `x,y,width,height` into a clamped region.
pub fn parse_region(s: &str) -> Result<Region, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid region '{s}': {e}"))?;

    match parts.as_slice() {
        [x, y, w, h] => Ok(Region::new(*x, *y, *w, *h)),
        _ => Err(format!(
            "invalid region '{s}': expected x,y,width,height"
        )),
    }
}
