//! Population-weighted median cut.
//!
//! Starts with one box holding every distinct opaque color, then repeatedly
//! splits the box with the highest `max_range * ln(population + 1)` score
//! along its widest channel, at the point where the cumulative pixel count
//! crosses half of the box population. Each terminal box becomes one palette
//! entry: the population-weighted mean of its colors.

use std::collections::HashMap;

use super::palette::Palette;
use crate::color::Rgb8;
use crate::preprocess::PixelBuffer;

/// Upper bound on the number of palette entries.
pub const MAX_PALETTE_SIZE: usize = 1300;

/// A distinct opaque color and the number of pixels showing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSample {
    pub rgb: Rgb8,
    pub count: u64,
}

/// Deduplicate the opaque pixels of `buffer`, in first-seen order.
pub fn collect_samples(buffer: &PixelBuffer) -> Vec<ColorSample> {
    let mut samples: Vec<ColorSample> = Vec::new();
    let mut positions: HashMap<Rgb8, usize> = HashMap::new();

    for i in 0..buffer.len() {
        if !buffer.is_opaque(i) {
            continue;
        }
        let rgb = buffer.rgb(i);
        match positions.get(&rgb) {
            Some(&pos) => samples[pos].count += 1,
            None => {
                positions.insert(rgb, samples.len());
                samples.push(ColorSample { rgb, count: 1 });
            }
        }
    }
    samples
}

/// Channel a box is split along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    #[inline]
    fn of(self, rgb: Rgb8) -> u8 {
        match self {
            Channel::Red => rgb.r,
            Channel::Green => rgb.g,
            Channel::Blue => rgb.b,
        }
    }
}

#[derive(Debug, Clone)]
struct ColorBox {
    indices: Vec<usize>,
    population: u64,
    ranges: [u8; 3],
    score: f64,
    /// Cleared once a split attempt fails; the box stays in the palette.
    splittable: bool,
}

impl ColorBox {
    fn new(indices: Vec<usize>, samples: &[ColorSample]) -> Self {
        let mut min = [255u8; 3];
        let mut max = [0u8; 3];
        let mut population = 0u64;

        for &idx in &indices {
            let s = samples[idx];
            for (c, v) in [s.rgb.r, s.rgb.g, s.rgb.b].into_iter().enumerate() {
                min[c] = min[c].min(v);
                max[c] = max[c].max(v);
            }
            population += s.count;
        }

        let ranges = [
            max[0].saturating_sub(min[0]),
            max[1].saturating_sub(min[1]),
            max[2].saturating_sub(min[2]),
        ];
        let max_range = ranges.iter().copied().max().unwrap_or(0).max(1);

        Self {
            splittable: indices.len() > 1,
            indices,
            population,
            ranges,
            score: max_range as f64 * ((population + 1) as f64).ln(),
        }
    }

    /// Widest channel; green wins ties with red, blue wins remaining ties.
    fn split_channel(&self) -> Channel {
        let [r, g, b] = self.ranges;
        if g >= r && g >= b {
            Channel::Green
        } else if b >= r && b >= g {
            Channel::Blue
        } else {
            Channel::Red
        }
    }

    fn split(&self, samples: &[ColorSample]) -> Option<(ColorBox, ColorBox)> {
        if self.indices.len() < 2 {
            return None;
        }
        let channel = self.split_channel();

        let mut sorted = self.indices.clone();
        sorted.sort_by_key(|&idx| channel.of(samples[idx].rgb));

        let midpoint = self.population as f64 / 2.0;
        let mut low = Vec::new();
        let mut high = Vec::new();
        let mut accumulated = 0u64;
        for &idx in &sorted {
            if (accumulated as f64) < midpoint {
                low.push(idx);
            } else {
                high.push(idx);
            }
            accumulated += samples[idx].count;
        }

        if low.is_empty() || high.is_empty() {
            let half = sorted.len().div_ceil(2);
            high = sorted.split_off(half);
            low = sorted;
        }
        if low.is_empty() || high.is_empty() {
            return None;
        }

        Some((ColorBox::new(low, samples), ColorBox::new(high, samples)))
    }

    fn average(&self, samples: &[ColorSample]) -> Rgb8 {
        let mut sums = [0f64; 3];
        let mut total = 0f64;
        for &idx in &self.indices {
            let s = samples[idx];
            let weight = s.count as f64;
            for (c, v) in s.rgb.to_f64().into_iter().enumerate() {
                sums[c] += v * weight;
            }
            total += weight;
        }
        if total == 0.0 {
            total = 1.0;
        }
        Rgb8::from_f64(sums[0] / total, sums[1] / total, sums[2] / total)
    }
}

/// Reduce `samples` to at most `max_colors` representatives.
///
/// `max_colors` is clamped into `1..=MAX_PALETTE_SIZE`. With no samples the
/// single-entry black fallback is returned. Never fails: when boxes cannot be
/// split further the palette simply has fewer entries.
pub fn palette_from_samples(samples: &[ColorSample], max_colors: usize) -> Palette {
    if samples.is_empty() {
        return Palette::fallback();
    }

    let target = max_colors.clamp(1, MAX_PALETTE_SIZE).min(samples.len());
    let mut boxes = vec![ColorBox::new((0..samples.len()).collect(), samples)];

    while boxes.len() < target {
        // Stable: equal scores keep their current relative order.
        boxes.sort_by(|a, b| b.score.total_cmp(&a.score));
        let Some(pos) = boxes.iter().position(|b| b.splittable) else {
            break;
        };
        match boxes[pos].split(samples) {
            Some((low, high)) => {
                boxes.remove(pos);
                boxes.push(low);
                boxes.push(high);
            }
            None => boxes[pos].splittable = false,
        }
    }

    Palette::new(boxes.iter().map(|b| b.average(samples)).collect())
}

/// Build a palette of at most `max_colors` entries for `buffer`.
///
/// # Example
///
/// ```
/// use raster_strokes::{build_palette, PixelBuffer, Rgb8};
///
/// let pixels = [Rgb8::new(255, 0, 0), Rgb8::new(0, 255, 0)];
/// let buffer = PixelBuffer::from_rgb(2, 1, &pixels).unwrap();
/// let palette = build_palette(&buffer, 2);
/// assert_eq!(palette.len(), 2);
/// ```
pub fn build_palette(buffer: &PixelBuffer, max_colors: usize) -> Palette {
    let samples = collect_samples(buffer);
    let palette = palette_from_samples(&samples, max_colors);
    tracing::debug!(
        distinct_colors = samples.len(),
        requested = max_colors,
        produced = palette.len(),
        "Built palette"
    );
    palette
}
