//! Generative effects: stroke patterns drawn without a source image.
//!
//! Each [`EffectKind`] traces a handful of polylines inside the effect area.
//! Consecutive points become straight strokes that go through the same sink,
//! orderer and emitter as image plans, so an effect streams and cancels like
//! any other drawing.
//!
//! ```
//! use raster_strokes::{render_effect, EffectKind, EffectOptions, Rgb8, SurfaceSize};
//!
//! let options = EffectOptions { seed: Some(42), ..EffectOptions::default() };
//! let effect = render_effect(
//!     EffectKind::Vortex,
//!     SurfaceSize::new(300, 300),
//!     None,
//!     &options,
//!     Rgb8::new(20, 80, 200),
//! )
//! .unwrap();
//! assert_eq!(effect.paths, 4);
//! assert!(!effect.plan.is_empty());
//! ```

mod patterns;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::color::Rgb8;
use crate::output::{CommandOrderer, StrokePlan};
use crate::palette::Palette;
use crate::plan::{Orientation, Phase, Placement, PlannedStrokes, Region, StrokeSink, SurfaceSize};
use crate::style::ParseModeError;

pub const DEFAULT_DENSITY: f64 = 70.0;
pub const DEFAULT_TEMPO: f64 = 60.0;

/// The available patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    Aurora,
    Vortex,
    Firefly,
    Cascade,
}

impl EffectKind {
    pub const ALL: [EffectKind; 4] = [Self::Aurora, Self::Vortex, Self::Firefly, Self::Cascade];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aurora => "aurora",
            Self::Vortex => "vortex",
            Self::Firefly => "firefly",
            Self::Cascade => "cascade",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Aurora => "Aurora sweep",
            Self::Vortex => "Vortex bloom",
            Self::Firefly => "Firefly scatter",
            Self::Cascade => "Cascade drapery",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Aurora => "Layered sine ribbons sweeping across the area",
            Self::Vortex => "Spiral arms winding out from the center",
            Self::Firefly => "Bursts of short curved flutters at random spots",
            Self::Cascade => "Rippling rows that drape down the area",
        }
    }

    /// Number of polylines the pattern traces for `options`, mirrored
    /// passes included.
    pub fn path_count(self, options: &EffectOptions) -> usize {
        let options = options.sanitized();
        let passes = if options.mirror { 2 } else { 1 };
        match self {
            Self::Aurora => patterns::stripes(options.density) * passes,
            Self::Vortex => patterns::arms(options.mirror),
            Self::Firefly => patterns::bursts(options.density) * passes,
            Self::Cascade => patterns::rows(options.density) * passes,
        }
    }

    fn orientation(self) -> Orientation {
        match self {
            Self::Aurora => Orientation::AuroraRibbon,
            Self::Vortex => Orientation::VortexArm,
            Self::Firefly => Orientation::FireflyFlutter,
            Self::Cascade => Orientation::CascadeRibbon,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| ParseModeError {
                kind: "effect",
                value: s.to_string(),
                expected: "aurora, vortex, firefly, cascade",
            })
    }
}

/// Knobs shared by every pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectOptions {
    /// How many ribbons, arms or bursts to lay down, 10..=120.
    pub density: f64,
    /// Replay speed, 10..=160. Higher is faster.
    pub tempo: f64,
    /// Add a mirrored pass after each path.
    pub mirror: bool,
    /// Perturb the curves.
    pub jitter: bool,
    /// Seed for the random parts. Drawn fresh when absent.
    pub seed: Option<u64>,
}

impl Default for EffectOptions {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            tempo: DEFAULT_TEMPO,
            mirror: true,
            jitter: true,
            seed: None,
        }
    }
}

impl EffectOptions {
    /// Clamp numeric fields into range; non-finite values take defaults.
    pub fn sanitized(&self) -> Self {
        let finite = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Self {
            density: finite(self.density, DEFAULT_DENSITY).clamp(10.0, 120.0),
            tempo: finite(self.tempo, DEFAULT_TEMPO).clamp(10.0, 160.0),
            ..self.clone()
        }
    }

    pub fn timing(&self) -> EffectTiming {
        EffectTiming::from_tempo(self.tempo)
    }
}

/// Replay pacing derived from tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectTiming {
    /// Pause between consecutive strokes of one path.
    pub step_delay_ms: u64,
    /// Pause after each path.
    pub stroke_gap_ms: u64,
}

impl EffectTiming {
    pub fn from_tempo(tempo: f64) -> Self {
        let tempo = (if tempo.is_finite() { tempo } else { DEFAULT_TEMPO }).clamp(10.0, 160.0);
        let step = (22.0 - tempo / 6.0).round().max(2.0);
        let gap = (step * 2.0).round().max(6.0);
        Self {
            step_delay_ms: step as u64,
            stroke_gap_ms: gap as u64,
        }
    }

    pub fn duration_ms(&self, strokes: usize, paths: usize) -> u64 {
        strokes as u64 * self.step_delay_ms + paths as u64 * self.stroke_gap_ms
    }
}

/// The pixel rectangle an effect may draw in.
///
/// Region edges are snapped to whole surface pixels and kept at least one
/// pixel wide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Right clamp edge, at least one pixel past `x`.
    pub max_x: f64,
    /// Bottom clamp edge, at least one pixel past `y`.
    pub max_y: f64,
}

impl EffectArea {
    /// Returns `None` for an empty surface or a region with no area.
    pub fn resolve(surface: SurfaceSize, region: Option<&Region>) -> Option<Self> {
        if surface.is_empty() {
            return None;
        }
        let (board_w, board_h) = (surface.width as f64, surface.height as f64);
        let Some(region) = region else {
            return Some(Self {
                x: 0.0,
                y: 0.0,
                width: board_w,
                height: board_h,
                max_x: board_w,
                max_y: board_h,
            });
        };
        if region.is_degenerate() {
            return None;
        }

        let x = (region.x() * board_w).round().clamp(0.0, board_w);
        let y = (region.y() * board_h).round().clamp(0.0, board_h);
        let width = (region.width() * board_w)
            .round()
            .max(1.0)
            .clamp(1.0, (board_w - x).max(1.0));
        let height = (region.height() * board_h)
            .round()
            .max(1.0)
            .clamp(1.0, (board_h - y).max(1.0));

        Some(Self {
            x,
            y,
            width,
            height,
            max_x: (x + width).min(board_w).max(x + 1.0),
            max_y: (y + height).min(board_h).max(y + 1.0),
        })
    }

    fn clamp(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x.clamp(self.x, self.max_x), y.clamp(self.y, self.max_y))
    }

    fn mirror_x(&self, x: f64) -> f64 {
        self.x + self.width - (x - self.x)
    }

    fn mirror_y(&self, y: f64) -> f64 {
        self.y + self.height - (y - self.y)
    }
}

/// A rendered effect, ready to emit.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectPlan {
    pub kind: EffectKind,
    pub area: EffectArea,
    pub timing: EffectTiming,
    /// Seed the random parts were drawn from; pass it back to replay.
    pub seed: u64,
    /// Polylines traced, mirrored passes included.
    pub paths: usize,
    pub plan: StrokePlan,
}

/// Trace `kind` over the region (or the whole surface) in one color.
///
/// The plan's duration estimate uses the tempo pacing rather than the
/// fixed per-stroke budget of image plans. Returns `None` when
/// [`EffectArea::resolve`] does.
pub fn render_effect(
    kind: EffectKind,
    surface: SurfaceSize,
    region: Option<&Region>,
    options: &EffectOptions,
    color: Rgb8,
) -> Option<EffectPlan> {
    let area = EffectArea::resolve(surface, region)?;
    let options = options.sanitized();
    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let paths = patterns::trace(kind, &area, &options, &mut rng);

    let (board_w, board_h) = (surface.width as f64, surface.height as f64);
    let mut sink = StrokeSink::new(board_w, board_h, 1);
    for path in &paths {
        for pair in path.windows(2) {
            if pair[0] == pair[1] {
                continue;
            }
            sink.push(0, pair[0], pair[1], kind.orientation(), Phase::Effect);
        }
    }

    let groups = sink.into_groups();
    let strokes = groups.iter().map(Vec::len).sum::<usize>();
    let planned = PlannedStrokes {
        groups,
        coverage: vec![strokes as f64],
        placement: Some(Placement {
            board_width: board_w,
            board_height: board_h,
            target_x: area.x,
            target_y: area.y,
            target_width: area.width,
            target_height: area.height,
            scale: 1.0,
            offset_x: area.x,
            offset_y: area.y,
            draw_width: area.width,
            draw_height: area.height,
            region_active: region.is_some(),
        }),
        lane_count: 0,
        truncated: false,
    };

    let timing = options.timing();
    let mut plan = CommandOrderer::default().finish(&Palette::new(vec![color]), planned, 0);
    plan.metrics.estimated_duration_ms = timing.duration_ms(plan.len(), paths.len());

    tracing::debug!(
        effect = %kind,
        seed,
        paths = paths.len(),
        strokes = plan.len(),
        "rendered effect"
    );

    Some(EffectPlan {
        kind,
        area,
        timing,
        seed,
        paths: paths.len(),
        plan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{emit, CancellationToken};
    use crate::output::StrokeCommand;

    const INK: Rgb8 = Rgb8::new(10, 120, 200);

    fn seeded(seed: u64) -> EffectOptions {
        EffectOptions {
            seed: Some(seed),
            ..EffectOptions::default()
        }
    }

    fn render(kind: EffectKind, region: Option<&Region>, options: &EffectOptions) -> EffectPlan {
        render_effect(kind, SurfaceSize::new(400, 300), region, options, INK).unwrap()
    }

    #[test]
    fn test_each_effect_stays_in_region() {
        let region = Region::new(0.25, 0.5, 0.5, 0.5);
        for kind in EffectKind::ALL {
            let effect = render(kind, Some(&region), &seeded(11));
            let area = effect.area;
            assert_eq!(effect.paths, kind.path_count(&EffectOptions::default()));
            assert!(!effect.plan.is_empty(), "{kind} drew nothing");

            // Sink nudges can push an endpoint 0.75 px past the clamp edge.
            let (nx, ny) = (0.75 / 400.0 + 1e-6, 0.75 / 300.0 + 1e-6);
            let (min_x, max_x) = (area.x / 400.0 - nx, area.max_x / 400.0 + nx);
            let (min_y, max_y) = (area.y / 300.0 - ny, area.max_y / 300.0 + ny);
            for c in &effect.plan.commands {
                assert!((min_x..=max_x).contains(&c.x1) && (min_x..=max_x).contains(&c.x2));
                assert!((min_y..=max_y).contains(&c.y1) && (min_y..=max_y).contains(&c.y2));
                assert_eq!(c.orientation, kind.orientation());
                assert_eq!(c.color, "#0a78c8");
            }
        }
    }

    #[test]
    fn test_stroke_count_bounded_by_segments() {
        for kind in EffectKind::ALL {
            let options = seeded(5);
            let area = EffectArea::resolve(SurfaceSize::new(400, 300), None).unwrap();
            let paths = patterns::trace(
                kind,
                &area,
                &options,
                &mut StdRng::seed_from_u64(5),
            );
            let segments: usize = paths.iter().map(|p| p.len() - 1).sum();

            let effect = render(kind, None, &options);
            assert!(effect.plan.len() <= segments, "{kind}");
            assert_eq!(effect.plan.metrics.estimated_strokes, effect.plan.len());
        }
    }

    #[test]
    fn test_seed_replays_same_commands() {
        for kind in [EffectKind::Firefly, EffectKind::Cascade] {
            let a = render(kind, None, &seeded(99));
            let b = render(kind, None, &seeded(99));
            assert_eq!(a.plan.commands, b.plan.commands);
            assert_eq!(a.seed, 99);
        }
        let a = render(EffectKind::Firefly, None, &seeded(1));
        let b = render(EffectKind::Firefly, None, &seeded(2));
        assert_ne!(a.plan.commands, b.plan.commands);
    }

    #[test]
    fn test_unseeded_reports_seed_used() {
        let first = render(EffectKind::Firefly, None, &EffectOptions::default());
        let replay = render(EffectKind::Firefly, None, &seeded(first.seed));
        assert_eq!(first.plan.commands, replay.plan.commands);
    }

    #[test]
    fn test_duration_follows_tempo() {
        let effect = render(EffectKind::Vortex, None, &seeded(0));
        assert_eq!(effect.timing.step_delay_ms, 12);
        assert_eq!(effect.timing.stroke_gap_ms, 24);
        assert_eq!(
            effect.plan.metrics.estimated_duration_ms,
            effect.plan.len() as u64 * 12 + 4 * 24
        );
    }

    #[test]
    fn test_timing_bounds() {
        let fast = EffectTiming::from_tempo(500.0);
        assert_eq!((fast.step_delay_ms, fast.stroke_gap_ms), (2, 6));
        let slow = EffectTiming::from_tempo(10.0);
        assert_eq!((slow.step_delay_ms, slow.stroke_gap_ms), (20, 40));
        assert_eq!(EffectTiming::from_tempo(f64::NAN), EffectTiming::from_tempo(60.0));
    }

    #[test]
    fn test_area_snaps_region_to_pixels() {
        let region = Region::new(0.101, 0.2, 0.5, 0.3);
        let area = EffectArea::resolve(SurfaceSize::new(200, 100), Some(&region)).unwrap();
        assert_eq!((area.x, area.y, area.width, area.height), (20.0, 20.0, 100.0, 30.0));
        assert_eq!((area.max_x, area.max_y), (120.0, 50.0));

        let sliver = Region::new(0.5, 0.5, 0.001, 0.001);
        let area = EffectArea::resolve(SurfaceSize::new(200, 100), Some(&sliver)).unwrap();
        assert_eq!((area.width, area.height), (1.0, 1.0));
    }

    #[test]
    fn test_nothing_to_draw() {
        let flat = Region::new(0.2, 0.2, 0.0, 0.5);
        assert!(EffectArea::resolve(SurfaceSize::new(100, 100), Some(&flat)).is_none());
        assert!(render_effect(
            EffectKind::Aurora,
            SurfaceSize::new(0, 100),
            None,
            &EffectOptions::default(),
            INK
        )
        .is_none());
    }

    #[test]
    fn test_cancelled_emission_draws_nothing() {
        let effect = render(EffectKind::Cascade, None, &seeded(4));
        let token = CancellationToken::new();
        token.cancel();
        let mut drawn: Vec<StrokeCommand> = Vec::new();
        let outcome = emit(&effect.plan.commands, &mut drawn, &token).unwrap();
        assert!(outcome.is_cancelled());
        assert!(drawn.is_empty());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(" Vortex ".parse::<EffectKind>().unwrap(), EffectKind::Vortex);
        let err = "sparkle".parse::<EffectKind>().unwrap_err();
        assert_eq!(err.kind, "effect");
        assert_eq!(
            serde_json::to_string(&EffectKind::Firefly).unwrap(),
            "\"firefly\""
        );
    }

    #[test]
    fn test_options_sanitized() {
        let options = EffectOptions {
            density: f64::NAN,
            tempo: 900.0,
            ..EffectOptions::default()
        }
        .sanitized();
        assert_eq!(options.density, DEFAULT_DENSITY);
        assert_eq!(options.tempo, 160.0);
    }
}
