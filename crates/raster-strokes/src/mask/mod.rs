//! Boolean per-pixel masks derived from the source and its assignment.
//!
//! Two masks feed the planner:
//!
//! - [`detail_mask`] flags pixels sitting on a sharp change in the *source*
//!   colors, before quantization.
//! - [`edge_mask`] flags pixels bordering a different palette index in the
//!   *assignment*.
//!
//! Both only consider the four orthogonal neighbors and never flag skipped
//! pixels.

use crate::color::perceptual_distance;
use crate::dither::AssignmentMap;
use crate::preprocess::PixelBuffer;

/// Perceptual distance above which neighboring source colors count as detail.
pub const DETAIL_THRESHOLD: f64 = 4200.0;

const NEIGHBORS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A width x height grid of flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    /// An all-false mask.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Flag at linear position `idx`.
    #[inline]
    pub fn at(&self, idx: usize) -> bool {
        self.bits[idx]
    }

    /// Flag at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    /// Number of set flags.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Whether any flag is set in row `y` for columns `start..end`.
    pub fn any_in_row_span(&self, y: usize, start: usize, end: usize) -> bool {
        let row = y * self.width;
        self.bits[row + start..row + end].iter().any(|&b| b)
    }
}

fn orthogonal(x: usize, y: usize, width: usize, height: usize) -> impl Iterator<Item = usize> {
    NEIGHBORS.into_iter().filter_map(move |(dx, dy)| {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
            None
        } else {
            Some(ny as usize * width + nx as usize)
        }
    })
}

/// Flag assigned pixels whose original color differs sharply from at least
/// one orthogonal neighbor.
///
/// Neighbor colors are read from the buffer as-is, transparent or not.
pub fn detail_mask(buffer: &PixelBuffer, assignments: &AssignmentMap) -> Mask {
    let (width, height) = (assignments.width(), assignments.height());
    let mut mask = Mask::empty(width, height);

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if assignments.is_skip(idx) {
                continue;
            }
            let here = buffer.rgb(idx).to_f64();
            mask.bits[idx] = orthogonal(x, y, width, height)
                .any(|n| perceptual_distance(here, buffer.rgb(n).to_f64()) > DETAIL_THRESHOLD);
        }
    }

    tracing::trace!(count = mask.count(), "detail mask built");
    mask
}

/// Flag assigned pixels with an orthogonal neighbor that is assigned to a
/// different palette entry.
pub fn edge_mask(assignments: &AssignmentMap) -> Mask {
    let (width, height) = (assignments.width(), assignments.height());
    let mut mask = Mask::empty(width, height);

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let index = assignments.at(idx);
            if index == AssignmentMap::SKIP {
                continue;
            }
            mask.bits[idx] = orthogonal(x, y, width, height).any(|n| {
                let other = assignments.at(n);
                other != AssignmentMap::SKIP && other != index
            });
        }
    }

    tracing::trace!(count = mask.count(), "edge mask built");
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb8;

    #[test]
    fn test_edge_mask_marks_boundary_columns() {
        let assignments = AssignmentMap::from_indices(4, 2, vec![0, 0, 1, 1, 0, 0, 1, 1]).unwrap();
        let mask = edge_mask(&assignments);
        for y in 0..2 {
            assert!(!mask.get(0, y));
            assert!(mask.get(1, y));
            assert!(mask.get(2, y));
            assert!(!mask.get(3, y));
        }
        assert_eq!(mask.count(), 4);
    }

    #[test]
    fn test_edge_mask_ignores_skipped_neighbors() {
        let skip = AssignmentMap::SKIP;
        let assignments = AssignmentMap::from_indices(3, 1, vec![0, skip, 1]).unwrap();
        let mask = edge_mask(&assignments);
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_detail_mask_uses_source_colors() {
        // Both pixels map to entry 0, but the source colors differ strongly.
        let buffer =
            PixelBuffer::from_rgb(2, 1, &[Rgb8::new(0, 0, 0), Rgb8::new(0, 120, 0)]).unwrap();
        let assignments = AssignmentMap::from_indices(2, 1, vec![0, 0]).unwrap();
        let mask = detail_mask(&buffer, &assignments);
        assert!(mask.get(0, 0));
        assert!(mask.get(1, 0));
        assert_eq!(edge_mask(&assignments).count(), 0);
    }

    #[test]
    fn test_detail_mask_below_threshold() {
        // 4 * 30^2 = 3600 stays under the threshold.
        let buffer =
            PixelBuffer::from_rgb(2, 1, &[Rgb8::new(0, 0, 0), Rgb8::new(0, 30, 0)]).unwrap();
        let assignments = AssignmentMap::from_indices(2, 1, vec![0, 0]).unwrap();
        assert_eq!(detail_mask(&buffer, &assignments).count(), 0);
    }

    #[test]
    fn test_detail_mask_skips_transparent_pixels() {
        let buffer = PixelBuffer::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 0]).unwrap();
        let assignments =
            AssignmentMap::from_indices(2, 1, vec![0, AssignmentMap::SKIP]).unwrap();
        let mask = detail_mask(&buffer, &assignments);
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
    }

    #[test]
    fn test_any_in_row_span() {
        let assignments = AssignmentMap::from_indices(4, 1, vec![0, 0, 1, 1]).unwrap();
        let mask = edge_mask(&assignments);
        assert!(!mask.any_in_row_span(0, 0, 1));
        assert!(mask.any_in_row_span(0, 0, 2));
        assert!(mask.any_in_row_span(0, 2, 4));
        assert!(!mask.any_in_row_span(0, 3, 4));
    }
}
