//! Per-image pipeline state.

use std::sync::Arc;

use super::cache::{CacheKey, CommandCache};
use crate::dither::{AssignmentMap, Dither, DitherOptions, FloydSteinberg};
use crate::mask::{detail_mask, edge_mask, Mask};
use crate::output::{CommandOrderer, StrokePlan};
use crate::palette::{build_palette, Palette};
use crate::plan::{Region, StrokePlanner, SurfaceSize};
use crate::preprocess::PixelBuffer;
use crate::style::StyleConfig;

/// Owns the frozen artifacts derived from one source image.
///
/// [`PipelineContext::prepare`] runs quantization, dithering and mask
/// building once. [`PipelineContext::plan`] can then be called repeatedly
/// with different surfaces, regions and styles; results for an unchanged
/// key come from a one-entry cache.
///
/// # Example
///
/// ```
/// use raster_strokes::{DitherOptions, PipelineContext, PixelBuffer, Rgb8, StyleConfig, SurfaceSize};
///
/// let buffer = PixelBuffer::from_rgb(2, 1, &[Rgb8::new(255, 0, 0), Rgb8::new(0, 255, 0)]).unwrap();
/// let mut ctx = PipelineContext::prepare(buffer, 2, DitherOptions::new());
/// assert_eq!(ctx.palette().len(), 2);
///
/// let plan = ctx.plan(SurfaceSize::new(200, 100), None, &StyleConfig::default());
/// assert!(!plan.is_empty());
/// ```
#[derive(Debug)]
pub struct PipelineContext {
    source: PixelBuffer,
    palette: Palette,
    dither: DitherOptions,
    assignments: AssignmentMap,
    usage: Vec<usize>,
    detail: Mask,
    edge: Mask,
    cache: CommandCache,
}

impl PipelineContext {
    /// Quantize `source` to at most `max_colors` entries and freeze the
    /// results.
    pub fn prepare(source: PixelBuffer, max_colors: usize, dither: DitherOptions) -> Self {
        let palette = build_palette(&source, max_colors);
        let (assignments, usage, detail, edge) = Self::assign(&source, &palette, &dither);
        tracing::info!(
            width = source.width(),
            height = source.height(),
            colors = palette.len(),
            assigned = assignments.assigned_count(),
            "prepared source image"
        );
        Self {
            source,
            palette,
            dither,
            assignments,
            usage,
            detail,
            edge,
            cache: CommandCache::new(),
        }
    }

    fn assign(
        source: &PixelBuffer,
        palette: &Palette,
        dither: &DitherOptions,
    ) -> (AssignmentMap, Vec<usize>, Mask, Mask) {
        let assignments = FloydSteinberg.dither(source, palette, dither);
        let usage = palette.usage(&assignments);
        let detail = detail_mask(source, &assignments);
        let edge = edge_mask(&assignments);
        (assignments, usage, detail, edge)
    }

    /// Re-run dithering against the existing palette with new options.
    ///
    /// The palette is kept; assignments, usage and masks are rebuilt and the
    /// cache is cleared. Same options are a no-op.
    pub fn redither(&mut self, dither: DitherOptions) {
        if dither == self.dither {
            return;
        }
        let (assignments, usage, detail, edge) = Self::assign(&self.source, &self.palette, &dither);
        self.dither = dither;
        self.assignments = assignments;
        self.usage = usage;
        self.detail = detail;
        self.edge = edge;
        self.invalidate();
    }

    /// Plan and order strokes, reusing the cached plan when nothing changed.
    pub fn plan(
        &mut self,
        surface: SurfaceSize,
        region: Option<&Region>,
        style: &StyleConfig,
    ) -> Arc<StrokePlan> {
        let key = CacheKey {
            source: (self.source.width(), self.source.height()),
            surface,
            style: style.signature(),
            region: region.map(Region::signature),
        };
        if let Some(plan) = self.cache.get(&key) {
            tracing::debug!(commands = plan.len(), "using cached plan");
            return plan;
        }

        let style = style.sanitized();
        let planned = StrokePlanner::new(&self.palette, &self.assignments, &self.detail, &self.edge)
            .plan(surface, region, &style);
        let plan = CommandOrderer::new(style.palette_order).finish(
            &self.palette,
            planned,
            self.assignments.assigned_count(),
        );
        tracing::debug!(
            commands = plan.len(),
            duration_ms = plan.metrics.estimated_duration_ms,
            "planned drawing"
        );
        self.cache.store(key, plan)
    }

    /// Drop any cached plan.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn dither_options(&self) -> &DitherOptions {
        &self.dither
    }

    pub fn assignments(&self) -> &AssignmentMap {
        &self.assignments
    }

    /// Pixel count per palette entry.
    pub fn usage(&self) -> &[usize] {
        &self.usage
    }

    pub fn detail_mask(&self) -> &Mask {
        &self.detail
    }

    pub fn edge_mask(&self) -> &Mask {
        &self.edge
    }
}
