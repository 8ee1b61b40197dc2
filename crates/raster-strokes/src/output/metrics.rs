//! Summary numbers for a planned drawing.

use serde::Serialize;

use crate::plan::PlannedStrokes;

/// Time budget per stroke when replayed by the default transport.
pub const MS_PER_STROKE: u64 = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetrics {
    /// Source pixels holding a palette index.
    pub pixel_count: usize,
    pub palette_count: usize,
    pub lane_count: usize,
    pub scale: f64,
    pub board_width: f64,
    pub board_height: f64,
    pub target_width: f64,
    pub target_height: f64,
    pub region_active: bool,
    pub estimated_strokes: usize,
    pub estimated_duration_ms: u64,
    /// The stroke budget thinned or cut this plan.
    pub truncated: bool,
}

impl PlanMetrics {
    pub(crate) fn new(
        planned: &PlannedStrokes,
        pixel_count: usize,
        palette_count: usize,
        strokes: usize,
    ) -> Self {
        let mut metrics = Self {
            pixel_count,
            palette_count,
            lane_count: planned.lane_count,
            estimated_strokes: strokes,
            estimated_duration_ms: strokes as u64 * MS_PER_STROKE,
            truncated: planned.truncated,
            ..Self::default()
        };
        if let Some(p) = &planned.placement {
            metrics.scale = p.scale;
            metrics.board_width = p.board_width;
            metrics.board_height = p.board_height;
            metrics.target_width = p.target_width;
            metrics.target_height = p.target_height;
            metrics.region_active = p.region_active;
        }
        metrics
    }
}
