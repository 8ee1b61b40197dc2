//! Planned stroke geometry before ordering.

use serde::{Deserialize, Serialize};

/// Emission layer of a stroke. Variant order is drawing order within one
/// palette group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Fill,
    FillSecondary,
    Detail,
    DetailEdge,
    Glaze,
    Texture,
    Echo,
    /// Strokes laid by a generative effect rather than a source image.
    Effect,
}

/// Which rule produced a stroke. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    RunPrimary,
    RunLane,
    MicroDetail,
    DetailOffset,
    EdgeCenter,
    GlazeUpper,
    GlazeLower,
    EchoUpper,
    EchoLower,
    TextureWeave,
    AuroraRibbon,
    VortexArm,
    FireflyFlutter,
    CascadeRibbon,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RunPrimary => "run-primary",
            Self::RunLane => "run-lane",
            Self::MicroDetail => "micro-detail",
            Self::DetailOffset => "detail-offset",
            Self::EdgeCenter => "edge-center",
            Self::GlazeUpper => "glaze-upper",
            Self::GlazeLower => "glaze-lower",
            Self::EchoUpper => "echo-upper",
            Self::EchoLower => "echo-lower",
            Self::TextureWeave => "texture-weave",
            Self::AuroraRibbon => "aurora-ribbon",
            Self::VortexArm => "vortex-arm",
            Self::FireflyFlutter => "firefly-flutter",
            Self::CascadeRibbon => "cascade-ribbon",
        }
    }
}

/// One segment in normalized surface coordinates, still tagged with its
/// phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawStroke {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub orientation: Orientation,
    pub phase: Phase,
}

/// Collects strokes per palette entry, normalizing surface-pixel endpoints.
#[derive(Debug)]
pub(crate) struct StrokeSink {
    board_width: f64,
    board_height: f64,
    groups: Vec<Vec<RawStroke>>,
    budget: usize,
    len: usize,
    truncated: bool,
}

/// Minimum normalized extent on an axis before a stroke is nudged.
const MIN_EXTENT: f64 = 1e-5;
/// Nudge applied to near-degenerate strokes, in surface pixels.
const NUDGE_PIXELS: f64 = 0.75;

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

impl StrokeSink {
    pub(crate) fn new(board_width: f64, board_height: f64, palette_len: usize) -> Self {
        Self {
            board_width,
            board_height,
            groups: vec![Vec::new(); palette_len],
            budget: usize::MAX,
            len: 0,
            truncated: false,
        }
    }

    /// Stop accepting strokes once `budget` have been kept.
    pub(crate) fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Whether any stroke was refused because the budget ran out.
    pub(crate) fn truncated(&self) -> bool {
        self.truncated
    }

    /// Add a stroke given in surface pixels.
    ///
    /// Strokes entirely off the board are dropped; the rest are clamped
    /// into the unit square. Past the budget every stroke is refused.
    pub(crate) fn push(
        &mut self,
        index: usize,
        (x1, y1): (f64, f64),
        (x2, y2): (f64, f64),
        orientation: Orientation,
        phase: Phase,
    ) {
        let Some(group) = self.groups.get_mut(index) else {
            return;
        };
        let (bw, bh) = (self.board_width, self.board_height);
        if x1.max(x2) <= 0.0 || y1.max(y2) <= 0.0 || x1.min(x2) >= bw || y1.min(y2) >= bh {
            return;
        }
        if self.len >= self.budget {
            self.truncated = true;
            return;
        }

        let nx1 = (x1 / bw).clamp(0.0, 1.0);
        let ny1 = (y1 / bh).clamp(0.0, 1.0);
        let mut nx2 = (x2 / bw).clamp(0.0, 1.0);
        let mut ny2 = (y2 / bh).clamp(0.0, 1.0);

        if (nx1 - nx2).abs() < MIN_EXTENT {
            let eps = NUDGE_PIXELS / bw;
            nx2 = (nx2 + if nx2 >= nx1 { eps } else { -eps }).clamp(0.0, 1.0);
        }
        if (ny1 - ny2).abs() < MIN_EXTENT {
            let eps = NUDGE_PIXELS / bh;
            ny2 = (ny2 + if ny2 >= ny1 { eps } else { -eps }).clamp(0.0, 1.0);
        }

        group.push(RawStroke {
            x1: round6(nx1),
            y1: round6(ny1),
            x2: round6(nx2),
            y2: round6(ny2),
            orientation,
            phase,
        });
        self.len += 1;
    }

    pub(crate) fn into_groups(self) -> Vec<Vec<RawStroke>> {
        self.groups
    }
}
