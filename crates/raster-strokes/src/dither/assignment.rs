//! Per-pixel palette assignment.

use thiserror::Error;

/// Raised when an index vector does not match the stated dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("assignment length mismatch: expected {expected} entries, got {actual}")]
pub struct AssignmentMapError {
    pub expected: usize,
    pub actual: usize,
}

/// One palette index per pixel, row-major, with [`AssignmentMap::SKIP`]
/// marking transparent pixels.
///
/// Built once by a [`Dither`](super::Dither) implementation and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentMap {
    width: usize,
    height: usize,
    indices: Vec<u16>,
}

impl AssignmentMap {
    /// Sentinel for pixels that are not drawn.
    pub const SKIP: u16 = 0xFFFF;

    /// A map with every pixel skipped.
    pub fn skipped(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            indices: vec![Self::SKIP; width * height],
        }
    }

    /// Wrap precomputed indices.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentMapError`] when `indices.len() != width * height`.
    pub fn from_indices(
        width: usize,
        height: usize,
        indices: Vec<u16>,
    ) -> Result<Self, AssignmentMapError> {
        if indices.len() != width * height {
            return Err(AssignmentMapError {
                expected: width * height,
                actual: indices.len(),
            });
        }
        Ok(Self {
            width,
            height,
            indices,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Index at linear position `idx`.
    #[inline]
    pub fn at(&self, idx: usize) -> u16 {
        self.indices[idx]
    }

    /// Index at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u16 {
        self.indices[y * self.width + x]
    }

    /// Whether the pixel at linear position `idx` is skipped.
    #[inline]
    pub fn is_skip(&self, idx: usize) -> bool {
        self.indices[idx] == Self::SKIP
    }

    /// Number of pixels holding a palette index.
    pub fn assigned_count(&self) -> usize {
        self.indices.iter().filter(|&&i| i != Self::SKIP).count()
    }

    pub(crate) fn set(&mut self, idx: usize, value: u16) {
        self.indices[idx] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_indices_checks_length() {
        let err = AssignmentMap::from_indices(2, 2, vec![0; 3]).unwrap_err();
        assert_eq!(
            err,
            AssignmentMapError {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_skipped_map() {
        let map = AssignmentMap::skipped(3, 2);
        assert_eq!(map.assigned_count(), 0);
        assert!(map.is_skip(5));
    }

    #[test]
    fn test_get_is_row_major() {
        let map = AssignmentMap::from_indices(2, 2, vec![0, 1, 2, 3]).unwrap();
        assert_eq!(map.get(1, 0), 1);
        assert_eq!(map.get(0, 1), 2);
        assert_eq!(map.at(3), 3);
    }
}
