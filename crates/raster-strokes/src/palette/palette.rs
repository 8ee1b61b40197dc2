//! Frozen palette with nearest-color lookup.

use serde::Serialize;

use crate::color::{perceptual_distance, ColorProfile, Rgb8};
use crate::dither::AssignmentMap;

/// One representative color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    /// Channel values.
    #[serde(flatten)]
    pub rgb: Rgb8,
    /// Lowercase `#rrggbb`, computed once.
    pub hex: String,
}

impl PaletteEntry {
    pub fn new(rgb: Rgb8) -> Self {
        Self {
            rgb,
            hex: rgb.to_hex(),
        }
    }
}

/// An ordered, immutable list of up to K representative colors.
///
/// Besides the colors themselves the palette precomputes each entry's
/// [`ColorProfile`], which the planner consults per run.
///
/// # Example
///
/// ```
/// use raster_strokes::{Palette, Rgb8};
///
/// let palette = Palette::new(vec![Rgb8::BLACK, Rgb8::WHITE]);
/// assert_eq!(palette.find_nearest([200.0, 190.0, 210.0]), 1);
/// assert_eq!(palette.hex(0), "#000000");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
    profiles: Vec<ColorProfile>,
}

impl Palette {
    /// Create a palette from colors in index order.
    ///
    /// An empty list yields an empty palette; the ditherer then marks every
    /// pixel as skipped.
    pub fn new(colors: Vec<Rgb8>) -> Self {
        let profiles = colors.iter().map(|&c| ColorProfile::of(c)).collect();
        let entries = colors.into_iter().map(PaletteEntry::new).collect();
        Self { entries, profiles }
    }

    /// Single black entry, used when the image has no opaque pixels.
    pub fn fallback() -> Self {
        Self::new(vec![Rgb8::BLACK])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    /// All entries in index order.
    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Color at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn color(&self, index: usize) -> Rgb8 {
        self.entries[index].rgb
    }

    /// Hex text at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn hex(&self, index: usize) -> &str {
        &self.entries[index].hex
    }

    /// Precomputed profile of the entry at `index`.
    #[inline]
    pub fn profile(&self, index: usize) -> Option<&ColorProfile> {
        self.profiles.get(index)
    }

    /// Index of the entry closest to `rgb` under [`perceptual_distance`].
    ///
    /// Ties go to the lowest index. Returns 0 for an empty palette; callers
    /// check emptiness first.
    pub fn find_nearest(&self, rgb: [f64; 3]) -> usize {
        let mut best_index = 0;
        let mut best_distance = f64::INFINITY;
        for (i, entry) in self.entries.iter().enumerate() {
            let distance = perceptual_distance(rgb, entry.rgb.to_f64());
            if distance < best_distance {
                best_distance = distance;
                best_index = i;
            }
        }
        best_index
    }

    /// Number of pixels assigned to each entry.
    pub fn usage(&self, assignments: &AssignmentMap) -> Vec<usize> {
        let mut usage = vec![0usize; self.len()];
        for index in assignments.indices().iter().copied() {
            if let Some(slot) = usage.get_mut(index as usize) {
                *slot += 1;
            }
        }
        usage
    }
}
