//! Row-run stroke planner.

use super::lanes::LaneModel;
use super::region::{Placement, Region, SurfaceSize};
use super::stroke::{Orientation, Phase, RawStroke, StrokeSink};
use crate::dither::AssignmentMap;
use crate::mask::Mask;
use crate::palette::Palette;
use crate::style::{DetailMode, StyleConfig};

const GLAZE_VALUE_THRESHOLD: f64 = 0.62;
const WEAVE_SATURATION_THRESHOLD: f64 = 0.4;

/// Most strokes one plan may hold.
pub const MAX_PLANNED_STROKES: usize = 1_000_000;

/// Non-weave accent strokes a single run can add on top of its lanes.
const ACCENTS_PER_RUN: usize = 6;

/// Strokes grouped by palette index, plus per-entry coverage scores.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStrokes {
    /// `groups[i]` holds the strokes for palette entry `i`, in planning order.
    pub groups: Vec<Vec<RawStroke>>,
    /// Ordering weight per palette entry.
    pub coverage: Vec<f64>,
    pub placement: Option<Placement>,
    pub lane_count: usize,
    /// Set when the stroke budget thinned lanes or cut strokes.
    pub truncated: bool,
}

impl PlannedStrokes {
    fn empty(palette_len: usize) -> Self {
        Self {
            groups: vec![Vec::new(); palette_len],
            coverage: vec![0.0; palette_len],
            placement: None,
            lane_count: 0,
            truncated: false,
        }
    }

    /// Total number of planned strokes.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Walks palette runs row by row and lays down strokes for each.
///
/// Every input is frozen; the planner only reads them.
pub struct StrokePlanner<'a> {
    palette: &'a Palette,
    assignments: &'a AssignmentMap,
    detail: &'a Mask,
    edge: &'a Mask,
    stroke_budget: usize,
}

/// A maximal horizontal span of one palette index.
struct Run {
    index: usize,
    y: usize,
    start: usize,
    end: usize,
    detail: bool,
    edge: bool,
}

impl Run {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<'a> StrokePlanner<'a> {
    pub fn new(
        palette: &'a Palette,
        assignments: &'a AssignmentMap,
        detail: &'a Mask,
        edge: &'a Mask,
    ) -> Self {
        Self {
            palette,
            assignments,
            detail,
            edge,
            stroke_budget: MAX_PLANNED_STROKES,
        }
    }

    /// Override [`MAX_PLANNED_STROKES`] for this planner.
    pub fn with_stroke_budget(mut self, budget: usize) -> Self {
        self.stroke_budget = budget.max(1);
        self
    }

    /// Plan strokes for the given surface, optional region and style.
    ///
    /// An empty palette, empty source, empty surface or zero-area region
    /// yields no strokes.
    pub fn plan(
        &self,
        surface: SurfaceSize,
        region: Option<&Region>,
        style: &StyleConfig,
    ) -> PlannedStrokes {
        let palette_len = self.palette.len();
        if palette_len == 0 {
            return PlannedStrokes::empty(0);
        }
        let Some(placement) = Placement::compute(
            self.assignments.width(),
            self.assignments.height(),
            surface,
            region,
        ) else {
            tracing::debug!("nothing to place, returning empty plan");
            return PlannedStrokes::empty(palette_len);
        };

        let mut runs = Vec::new();
        let mut stray = 0usize;
        for run in self.runs() {
            if run.index < palette_len {
                runs.push(run);
            } else {
                stray += 1;
            }
        }
        if stray > 0 {
            tracing::warn!(stray, palette_len, "skipping runs with out-of-range palette index");
        }

        let style = style.sanitized();
        let natural = LaneModel::new(placement.scale, &style);
        let natural_lanes = natural.lane_count();
        let max_lanes = (self.stroke_budget / runs.len().max(1))
            .saturating_sub(ACCENTS_PER_RUN)
            .max(1);
        let lanes = natural.capped(max_lanes);
        let mut sink = StrokeSink::new(placement.board_width, placement.board_height, palette_len)
            .with_budget(self.stroke_budget);
        let mut coverage = vec![0.0; palette_len];

        let mut layers = Layers {
            placement: &placement,
            lanes: &lanes,
            style: &style,
            palette: self.palette,
            spectral: style.spectral_accent.max(10.0) / 100.0,
            sink: &mut sink,
        };

        for run in &runs {
            let score = layers.run(run);
            if let Some(slot) = coverage.get_mut(run.index) {
                *slot += score;
            }
        }

        let truncated = lanes.lane_count() < natural_lanes || sink.truncated();
        let planned = PlannedStrokes {
            groups: sink.into_groups(),
            coverage,
            placement: Some(placement),
            lane_count: lanes.lane_count(),
            truncated,
        };
        if truncated {
            tracing::warn!(
                budget = self.stroke_budget,
                lanes = planned.lane_count,
                natural_lanes,
                "stroke budget reached, plan thinned"
            );
        }
        tracing::debug!(
            scale = placement.scale,
            lanes = planned.lane_count,
            strokes = planned.len(),
            "planned strokes"
        );
        planned
    }

    fn runs(&self) -> impl Iterator<Item = Run> + '_ {
        let width = self.assignments.width();
        (0..self.assignments.height()).flat_map(move |y| {
            let mut x = 0;
            std::iter::from_fn(move || {
                while x < width && self.assignments.get(x, y) == AssignmentMap::SKIP {
                    x += 1;
                }
                if x >= width {
                    return None;
                }
                let value = self.assignments.get(x, y);
                let start = x;
                while x < width && self.assignments.get(x, y) == value {
                    x += 1;
                }
                Some(Run {
                    index: value as usize,
                    y,
                    start,
                    end: x,
                    detail: self.detail.any_in_row_span(y, start, x),
                    edge: self.edge.any_in_row_span(y, start, x),
                })
            })
        })
    }
}

/// Per-plan state shared by every run.
struct Layers<'p> {
    placement: &'p Placement,
    lanes: &'p LaneModel,
    style: &'p StyleConfig,
    palette: &'p Palette,
    spectral: f64,
    sink: &'p mut StrokeSink,
}

impl Layers<'_> {
    /// Emit every layer for one run and return its coverage score.
    fn run(&mut self, run: &Run) -> f64 {
        let p = self.placement;
        let scale = p.scale;
        let len = run.len() as f64;
        let pad = self.lanes.coverage_pad;
        let start_x = p.offset_x + run.start as f64 * scale - pad;
        let end_x = p.offset_x + run.end as f64 * scale + pad;
        let center_x = p.offset_x + (run.start as f64 + len / 2.0) * scale;
        let center_y = p.offset_y + (run.y as f64 + 0.5) * scale;
        let idx = run.index;

        let mut coverage = len * self.lanes.lane_count() as f64;

        for (lane, &offset) in self.lanes.offsets.iter().enumerate() {
            let (orientation, phase) = if lane == 0 {
                (Orientation::RunPrimary, Phase::Fill)
            } else {
                (Orientation::RunLane, Phase::FillSecondary)
            };
            let y = center_y + offset;
            self.sink.push(idx, (start_x, y), (end_x, y), orientation, phase);
        }

        let style = self.style;
        let detail_offset = self.lanes.detail_offset;
        if style.micro_detail && run.len() <= self.lanes.micro_threshold {
            let half = (scale * 0.55).max(0.85);
            self.sink.push(
                idx,
                (center_x - half, center_y),
                (center_x + half, center_y),
                Orientation::MicroDetail,
                Phase::Detail,
            );
        } else if (run.detail && style.detail_mode != DetailMode::Minimal)
            || (run.edge && style.edge_emphasis)
        {
            let y = center_y + detail_offset;
            self.sink.push(
                idx,
                (start_x, y),
                (end_x, y),
                Orientation::DetailOffset,
                Phase::Detail,
            );
        }

        if run.edge && style.edge_emphasis {
            let half = (scale * 0.6).max(0.9);
            self.sink.push(
                idx,
                (center_x - half, center_y),
                (center_x + half, center_y),
                Orientation::EdgeCenter,
                Phase::DetailEdge,
            );
        }

        let profile = self.palette.profile(idx).copied();

        if style.highlight_glaze && profile.is_some_and(|pr| pr.value > GLAZE_VALUE_THRESHOLD) {
            let offset = (scale * 0.35).max(detail_offset * 0.45);
            self.pair(
                idx,
                start_x,
                end_x,
                center_y,
                offset,
                (Orientation::GlazeUpper, Orientation::GlazeLower),
                Phase::Glaze,
            );
            coverage += len * self.spectral * 0.65;
        }

        if style.gradient_echo && (run.detail || run.edge) {
            let offset = (scale * 0.42).max(detail_offset * 0.6);
            self.pair(
                idx,
                start_x,
                end_x,
                center_y,
                offset,
                (Orientation::EchoUpper, Orientation::EchoLower),
                Phase::Echo,
            );
            coverage += len * 0.55;
        }

        if style.texture_weave
            && profile.is_some_and(|pr| pr.saturation > WEAVE_SATURATION_THRESHOLD)
        {
            let count = self.weave(run, center_y);
            if count > 0 {
                coverage += len * 0.25 * self.spectral + count as f64 * 0.6;
            }
        }

        coverage
    }

    /// Two horizontal strokes mirrored above and below the centerline.
    #[allow(clippy::too_many_arguments)]
    fn pair(
        &mut self,
        idx: usize,
        start_x: f64,
        end_x: f64,
        center_y: f64,
        offset: f64,
        (upper, lower): (Orientation, Orientation),
        phase: Phase,
    ) {
        let above = center_y - offset;
        let below = center_y + offset;
        self.sink.push(idx, (start_x, above), (end_x, above), upper, phase);
        self.sink.push(idx, (start_x, below), (end_x, below), lower, phase);
    }

    /// Alternating short diagonals along the run. Returns how many were laid.
    fn weave(&mut self, run: &Run, center_y: f64) -> usize {
        let p = self.placement;
        let step = (4.0 / self.spectral.max(0.5)).round().max(1.0) as usize;
        let span = (p.scale * 0.6).max(0.9);
        let tail = (p.scale * 0.3).max(0.5);

        let mut count = 0;
        for (alt, px) in (run.start..run.end).step_by(step).enumerate() {
            let cx = p.offset_x + (px as f64 + 0.5) * p.scale;
            let dir = if alt % 2 == 0 { 1.0 } else { -1.0 };
            self.sink.push(
                run.index,
                (cx - span, center_y - tail * dir),
                (cx + span, center_y + tail * dir),
                Orientation::TextureWeave,
                Phase::Texture,
            );
            count += 1;
        }
        count
    }
}
