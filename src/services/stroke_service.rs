//! Image-to-commands compilation for the CLI and HTTP handlers.

use raster_strokes::{
    render_effect, DitherOptions, EffectKind, EffectOptions, EffectPlan, PipelineContext, Region,
    Rgb8, StrokePlan, StyleConfig, SurfaceSize,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ApiError, LoadError};
use crate::models::AppConfig;
use crate::services::image_loader::load_png_bytes;

/// Everything needed to plan one drawing
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub surface: SurfaceSize,
    pub region: Option<Region>,
    pub style: StyleConfig,
    pub max_colors: usize,
}

/// Everything needed to trace one generative effect
#[derive(Debug, Clone)]
pub struct EffectRequest {
    pub kind: EffectKind,
    pub surface: SurfaceSize,
    pub region: Option<Region>,
    pub options: EffectOptions,
    pub color: Rgb8,
}

/// One palette entry with its share of the image
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaletteSwatch {
    pub index: usize,
    pub hex: String,
    /// Lighter and darker variants for swatch rendering
    pub highlight: String,
    pub shadow: String,
    pub pixels: usize,
    /// Percentage of assigned pixels
    pub coverage: f64,
}

/// Source dimensions after downscaling
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub width: usize,
    pub height: usize,
    pub assigned_pixels: usize,
}

/// A compiled drawing ready to be emitted
#[derive(Debug, Clone)]
pub struct Drawing {
    pub source: SourceInfo,
    pub palette: Vec<PaletteSwatch>,
    pub plan: Arc<StrokePlan>,
}

/// Compiles PNG bytes into stroke plans using the application config
pub struct StrokeService {
    config: AppConfig,
}

impl StrokeService {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Request built purely from configuration
    pub fn default_request(&self) -> PlanRequest {
        PlanRequest {
            surface: self.config.surface.into(),
            region: None,
            style: self.config.style.clone(),
            max_colors: self.config.max_colors,
        }
    }

    /// Effect request built purely from configuration
    pub fn default_effect_request(&self, kind: EffectKind) -> EffectRequest {
        EffectRequest {
            kind,
            surface: self.config.surface.into(),
            region: None,
            options: self.config.effect.options.clone(),
            color: self.config.effect.color(),
        }
    }

    /// Trace a generative effect into stroke commands
    pub fn effect(&self, request: &EffectRequest) -> Result<EffectPlan, ApiError> {
        let effect = render_effect(
            request.kind,
            request.surface,
            request.region.as_ref(),
            &request.options,
            request.color,
        )
        .ok_or_else(|| ApiError::BadRequest("Effect area is empty".to_string()))?;
        tracing::info!(
            effect = %effect.kind,
            seed = effect.seed,
            paths = effect.paths,
            commands = effect.plan.len(),
            "Traced effect"
        );
        Ok(effect)
    }

    /// Decode, downscale, quantize and dither
    pub fn prepare(
        &self,
        png: &[u8],
        max_colors: usize,
        style: &StyleConfig,
    ) -> Result<PipelineContext, LoadError> {
        let buffer = load_png_bytes(png, self.config.max_dimension)?;
        let dither = DitherOptions::from_percent(style.dither_strength);
        Ok(PipelineContext::prepare(buffer, max_colors, dither))
    }

    /// Run the full pipeline for one request
    pub fn compile(&self, png: &[u8], request: &PlanRequest) -> Result<Drawing, LoadError> {
        let mut ctx = self.prepare(png, request.max_colors, &request.style)?;
        let plan = ctx.plan(request.surface, request.region.as_ref(), &request.style);
        tracing::info!(
            commands = plan.len(),
            colors = ctx.palette().len(),
            lanes = plan.metrics.lane_count,
            "Compiled drawing"
        );
        Ok(Drawing {
            source: source_info(&ctx),
            palette: palette_report(&ctx),
            plan,
        })
    }

    /// Compile on the blocking thread pool
    pub async fn compile_blocking(
        self: Arc<Self>,
        png: Vec<u8>,
        request: PlanRequest,
    ) -> Result<Drawing, ApiError> {
        tokio::task::spawn_blocking(move || self.compile(&png, &request))
            .await
            .map_err(|e| ApiError::Internal(format!("Compile task failed: {e}")))?
            .map_err(ApiError::from)
    }

    /// Palette summary without planning strokes
    pub async fn palette_blocking(
        self: Arc<Self>,
        png: Vec<u8>,
        max_colors: usize,
        style: StyleConfig,
    ) -> Result<(SourceInfo, Vec<PaletteSwatch>), ApiError> {
        tokio::task::spawn_blocking(move || {
            let ctx = self.prepare(&png, max_colors, &style)?;
            Ok::<_, LoadError>((source_info(&ctx), palette_report(&ctx)))
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Palette task failed: {e}")))?
        .map_err(ApiError::from)
    }
}

fn source_info(ctx: &PipelineContext) -> SourceInfo {
    SourceInfo {
        width: ctx.source().width(),
        height: ctx.source().height(),
        assigned_pixels: ctx.assignments().assigned_count(),
    }
}

const SWATCH_SHADE: f64 = 0.35;

/// Palette entries with pixel counts, most used first
pub fn palette_report(ctx: &PipelineContext) -> Vec<PaletteSwatch> {
    let total: usize = ctx.usage().iter().sum();
    let mut swatches: Vec<PaletteSwatch> = ctx
        .palette()
        .entries()
        .iter()
        .zip(ctx.usage())
        .enumerate()
        .map(|(index, (entry, &pixels))| PaletteSwatch {
            index,
            hex: entry.hex.clone(),
            highlight: entry.rgb.lighten(SWATCH_SHADE).to_hex(),
            shadow: entry.rgb.darken(SWATCH_SHADE).to_hex(),
            pixels,
            coverage: if total == 0 {
                0.0
            } else {
                pixels as f64 * 100.0 / total as f64
            },
        })
        .collect();
    swatches.sort_by(|a, b| b.pixels.cmp(&a.pixels));
    swatches
}
