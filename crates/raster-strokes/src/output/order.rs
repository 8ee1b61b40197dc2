//! Palette group ordering and phase sorting.

use std::cmp::Ordering;

use super::command::{StrokeCommand, StrokePlan};
use super::metrics::PlanMetrics;
use crate::palette::Palette;
use crate::plan::PlannedStrokes;
use crate::style::PaletteOrder;

/// Relative luminance on the 0..=255 scale.
fn luminance(palette: &Palette, index: usize) -> f64 {
    let c = palette.color(index);
    0.2126 * c.r as f64 + 0.7152 * c.g as f64 + 0.0722 * c.b as f64
}

/// Flattens grouped strokes into one drawing sequence.
///
/// Groups are ordered by [`PaletteOrder`]; inside a group strokes keep their
/// planning order except that lower [`Phase`](crate::plan::Phase)s go first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandOrderer {
    order: PaletteOrder,
}

impl CommandOrderer {
    pub fn new(order: PaletteOrder) -> Self {
        Self { order }
    }

    /// Palette indices in drawing order.
    pub fn group_order(&self, palette: &Palette, coverage: &[f64]) -> Vec<usize> {
        let mut keyed: Vec<(usize, f64, f64)> = (0..palette.len())
            .map(|i| {
                let cov = coverage.get(i).copied().unwrap_or(0.0);
                (i, luminance(palette, i), cov)
            })
            .collect();

        keyed.sort_by(|a, b| self.compare(a, b));
        keyed.into_iter().map(|(i, _, _)| i).collect()
    }

    fn compare(&self, a: &(usize, f64, f64), b: &(usize, f64, f64)) -> Ordering {
        let (_, lum_a, cov_a) = *a;
        let (_, lum_b, cov_b) = *b;
        match self.order {
            PaletteOrder::DarkFirst => lum_a
                .total_cmp(&lum_b)
                .then_with(|| cov_b.total_cmp(&cov_a)),
            PaletteOrder::LightFirst => lum_b
                .total_cmp(&lum_a)
                .then_with(|| cov_b.total_cmp(&cov_a)),
            PaletteOrder::Coverage => cov_b
                .total_cmp(&cov_a)
                .then_with(|| lum_a.total_cmp(&lum_b)),
        }
    }

    /// Produce the final command list. Phase tags are dropped here.
    pub fn order(&self, palette: &Palette, planned: PlannedStrokes) -> Vec<StrokeCommand> {
        let order = self.group_order(palette, &planned.coverage);
        let mut groups = planned.groups;
        let mut commands = Vec::with_capacity(groups.iter().map(Vec::len).sum());

        for index in order {
            let Some(strokes) = groups.get_mut(index) else {
                continue;
            };
            strokes.sort_by_key(|s| s.phase);
            let color = palette.hex(index);
            commands.extend(strokes.drain(..).map(|s| StrokeCommand {
                color: color.to_string(),
                x1: s.x1,
                y1: s.y1,
                x2: s.x2,
                y2: s.y2,
                orientation: s.orientation,
            }));
        }
        commands
    }

    /// Order `planned` and wrap it with metrics.
    pub fn finish(
        &self,
        palette: &Palette,
        planned: PlannedStrokes,
        pixel_count: usize,
    ) -> StrokePlan {
        let coverage = planned.coverage.clone();
        let total = planned.len();
        let metrics = PlanMetrics::new(&planned, pixel_count, palette.len(), total);
        let commands = self.order(palette, planned);
        StrokePlan {
            commands,
            metrics,
            coverage,
        }
    }
}
