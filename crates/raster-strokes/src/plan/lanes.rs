//! Lane spacing and accent offsets derived from scale and style.

use crate::style::StyleConfig;

/// Per-plan geometry constants, all in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneModel {
    /// Spacing before smoothness and density are applied.
    pub base_spacing: f64,
    pub spacing: f64,
    /// Horizontal overshoot on both ends of every run.
    pub coverage_pad: f64,
    /// Vertical offset of the detail accent stroke.
    pub detail_offset: f64,
    /// Runs this short or shorter get a micro accent.
    pub micro_threshold: usize,
    /// Perpendicular offsets from the row centerline, symmetric around 0.
    pub offsets: Vec<f64>,
}

fn base_spacing(scale: f64) -> f64 {
    if scale >= 24.0 {
        0.95
    } else if scale >= 12.0 {
        0.88
    } else if scale >= 6.0 {
        0.78
    } else {
        0.64
    }
}

impl LaneModel {
    /// `style` is expected to be sanitized.
    pub fn new(scale: f64, style: &StyleConfig) -> Self {
        let base_spacing = base_spacing(scale);
        let smoothing = 1.0 + style.smoothness / 100.0;
        let density = style.lane_density.max(10.0) / 100.0;
        let spacing = base_spacing / smoothing / density;

        let boost = style.coverage_pad / 100.0;
        let coverage_pad = (scale * 0.45 * boost).min((base_spacing * 1.5 * boost).max(0.9));

        let m = style.detail_mode.offset_multiplier();
        let detail_offset = (scale * 0.28 * m).min((base_spacing * 1.4 * m).max(0.45));

        let mut lane_count = ((scale + spacing * 0.5) / spacing).ceil().max(1.0) as usize;
        if style.low_res_enhancer {
            let floor = if scale < 1.5 {
                5
            } else if scale < 2.5 {
                4
            } else if scale < 4.0 {
                3
            } else {
                1
            };
            lane_count = lane_count.max(floor);
        }

        let offsets = if lane_count == 1 {
            vec![0.0]
        } else {
            let start = -((lane_count - 1) as f64 * spacing) / 2.0;
            (0..lane_count).map(|i| start + i as f64 * spacing).collect()
        };

        Self {
            base_spacing,
            spacing,
            coverage_pad,
            detail_offset,
            micro_threshold: style.detail_mode.micro_threshold(),
            offsets,
        }
    }

    #[inline]
    pub fn lane_count(&self) -> usize {
        self.offsets.len()
    }

    /// Limit the fan to at most `max_lanes`, widening the spacing so the
    /// remaining lanes still cover the same band.
    pub fn capped(mut self, max_lanes: usize) -> Self {
        let max_lanes = max_lanes.max(1);
        let n = self.lane_count();
        if n <= max_lanes {
            return self;
        }
        if max_lanes == 1 {
            self.offsets = vec![0.0];
            return self;
        }
        let band = (n - 1) as f64 * self.spacing;
        self.spacing = band / (max_lanes - 1) as f64;
        let start = -band / 2.0;
        self.offsets = (0..max_lanes)
            .map(|i| start + i as f64 * self.spacing)
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::DetailMode;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_style_at_scale_25() {
        let model = LaneModel::new(25.0, &StyleConfig::default());
        assert_eq!(model.base_spacing, 0.95);
        assert!(approx(model.spacing, 0.95 / 1.4));
        // min(25 * 0.45, max(0.9, 1.425))
        assert!(approx(model.coverage_pad, 1.425));
        // min(7.0, max(0.45, 1.33))
        assert!(approx(model.detail_offset, 1.33));
        // ceil((25 + s/2) / s) with s = 0.678571...
        assert_eq!(model.lane_count(), 38);
    }

    #[test]
    fn test_offsets_are_symmetric() {
        let model = LaneModel::new(3.0, &StyleConfig::default());
        let n = model.lane_count();
        for i in 0..n {
            assert!(approx(model.offsets[i], -model.offsets[n - 1 - i]));
        }
        for pair in model.offsets.windows(2) {
            assert!(approx(pair[1] - pair[0], model.spacing));
        }
    }

    #[test]
    fn test_low_res_enhancer_floors() {
        let style = StyleConfig {
            smoothness: 0.0,
            lane_density: 10.0,
            ..StyleConfig::default()
        };
        // Spacing is 6.4 here, so the base formula yields a single lane.
        let plain = StyleConfig {
            low_res_enhancer: false,
            ..style.clone()
        };
        assert_eq!(LaneModel::new(1.0, &plain).lane_count(), 1);
        assert_eq!(LaneModel::new(1.0, &style).lane_count(), 5);
        assert_eq!(LaneModel::new(2.0, &style).lane_count(), 4);
        assert_eq!(LaneModel::new(3.0, &style).lane_count(), 3);
    }

    #[test]
    fn test_single_lane_offset_is_zero() {
        let style = StyleConfig {
            smoothness: 0.0,
            lane_density: 10.0,
            low_res_enhancer: false,
            ..StyleConfig::default()
        };
        assert_eq!(LaneModel::new(1.0, &style).offsets, vec![0.0]);
    }

    #[test]
    fn test_capped_keeps_band_width() {
        let model = LaneModel::new(25.0, &StyleConfig::default());
        let first = model.offsets[0];
        let last = model.offsets[model.lane_count() - 1];

        let capped = model.clone().capped(5);
        assert_eq!(capped.lane_count(), 5);
        assert!(approx(capped.offsets[0], first));
        assert!(approx(capped.offsets[4], last));
        assert!(capped.spacing > model.spacing);

        assert_eq!(model.clone().capped(100), model);
        assert_eq!(model.capped(0).offsets, vec![0.0]);
    }

    #[test]
    fn test_detail_mode_constants() {
        let max = StyleConfig {
            detail_mode: DetailMode::Max,
            ..StyleConfig::default()
        };
        let model = LaneModel::new(2.0, &max);
        assert_eq!(model.micro_threshold, 4);
        // min(2 * 0.28 * 1.35, max(0.45, 0.64 * 1.4 * 1.35))
        assert!(approx(model.detail_offset, 0.756));
    }
}
