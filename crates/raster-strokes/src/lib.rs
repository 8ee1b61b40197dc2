//! raster-strokes: compile raster images into ordered stroke commands
//!
//! The pipeline turns a decoded RGBA buffer into a list of straight colored
//! segments that a drawing surface can replay to reproduce the image with a
//! bounded palette.
//!
//! # Quick Start
//!
//! [`PipelineContext`] runs every stage and caches the last plan:
//!
//! ```
//! use raster_strokes::{
//!     CancellationToken, DitherOptions, PipelineContext, PixelBuffer, Rgb8, StrokeCommand,
//!     StyleConfig, SurfaceSize,
//! };
//!
//! let pixels = vec![Rgb8::new(30, 30, 30); 16];
//! let buffer = PixelBuffer::from_rgb(4, 4, &pixels).unwrap();
//!
//! let mut ctx = PipelineContext::prepare(buffer, 8, DitherOptions::new());
//! let plan = ctx.plan(SurfaceSize::new(400, 400), None, &StyleConfig::default());
//!
//! let mut drawn: Vec<StrokeCommand> = Vec::new();
//! let outcome = raster_strokes::emit(&plan.commands, &mut drawn, &CancellationToken::new()).unwrap();
//! assert_eq!(outcome.emitted(), plan.len());
//! ```
//!
//! # Stages
//!
//! 1. [`build_palette`]: population-weighted median cut down to at most K
//!    colors.
//! 2. [`FloydSteinberg`]: serpentine error diffusion against the frozen
//!    palette, producing an [`AssignmentMap`].
//! 3. [`detail_mask`] / [`edge_mask`]: where the source changes sharply and
//!    where palette regions meet.
//! 4. [`StrokePlanner`]: row runs into fill lanes and accent layers.
//! 5. [`CommandOrderer`]: palette groups by luminance or coverage, strokes by
//!    phase.
//!
//! # Effects
//!
//! [`render_effect`] traces generative patterns (aurora, vortex, firefly,
//! cascade) into the same [`StrokePlan`] shape without any source image.
//!
//! # Color Distance
//!
//! Every nearest-color decision uses [`perceptual_distance`], a red-mean
//! weighted squared distance in sRGB:
//!
//! ```text
//! (2 + r̄/256)·ΔR² + 4·ΔG² + (2 + (255 − r̄)/256)·ΔB²
//! ```

pub mod color;
pub mod dither;
pub mod effects;
pub mod emit;
pub mod mask;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod plan;
pub mod preprocess;
pub mod style;


pub use color::{perceptual_distance, ColorProfile, Rgb8};
pub use dither::{
    nearest_assignment, AssignmentMap, AssignmentMapError, Dither, DitherOptions, FloydSteinberg,
};
pub use effects::{
    render_effect, EffectArea, EffectKind, EffectOptions, EffectPlan, EffectTiming,
};
pub use emit::{emit, CancellationToken, DrawingSurface, EmitError, EmitOutcome, WireSurface};
pub use mask::{detail_mask, edge_mask, Mask, DETAIL_THRESHOLD};
pub use output::{CommandOrderer, PlanMetrics, StrokeCommand, StrokePlan};
pub use palette::{build_palette, collect_samples, ColorSample, Palette, ParseColorError};
pub use pipeline::{CacheKey, CommandCache, PipelineContext};
pub use plan::{
    Orientation, Phase, Placement, PlannedStrokes, Region, StrokePlanner, SurfaceSize,
    MAX_PLANNED_STROKES,
};
pub use preprocess::{resize_to_fit, PixelBuffer, PixelBufferError, TRANSPARENCY_THRESHOLD};
pub use style::{DetailMode, PaletteOrder, ParseModeError, StyleConfig};
