//! Target rectangle selection and source-to-surface mapping.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A normalized sub-rectangle of the surface.
///
/// Construction never fails: values are clamped into `[0, 1]` and the origin
/// is pulled back so the rectangle stays inside the unit square.
///
/// # Example
///
/// ```
/// use raster_strokes::Region;
///
/// let region = Region::new(0.9, 0.0, 0.5, 2.0);
/// assert_eq!(region.x(), 0.5);
/// assert_eq!(region.height(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

fn unit(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let width = unit(width, 1.0);
        let height = unit(height, 1.0);
        Self {
            x: unit(x, 0.0).min(1.0 - width),
            y: unit(y, 0.0).min(1.0 - height),
            width,
            height,
        }
    }

    /// The whole surface.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Whether the rectangle has no area.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn signature(&self) -> RegionSignature {
        RegionSignature([
            self.x.to_bits(),
            self.y.to_bits(),
            self.width.to_bits(),
            self.height.to_bits(),
        ])
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            x: f64,
            y: f64,
            width: f64,
            height: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::new(raw.x, raw.y, raw.width, raw.height))
    }
}

/// Bit-exact key for a clamped [`Region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionSignature([u64; 4]);

/// Where and how large the source raster lands on the surface.
///
/// All lengths are in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub board_width: f64,
    pub board_height: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub target_width: f64,
    pub target_height: f64,
    /// Surface pixels per source pixel, equal on both axes.
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub draw_width: f64,
    pub draw_height: f64,
    pub region_active: bool,
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

impl Placement {
    /// Fit a `source_width` x `source_height` raster into the region (or the
    /// whole surface), preserving aspect ratio and centering the leftover.
    ///
    /// Returns `None` when there is nothing to draw: an empty source, an
    /// empty surface, or a region with no area. A region thinner than one
    /// surface pixel is widened to one pixel.
    pub fn compute(
        source_width: usize,
        source_height: usize,
        surface: SurfaceSize,
        region: Option<&Region>,
    ) -> Option<Self> {
        if source_width == 0 || source_height == 0 || surface.is_empty() {
            return None;
        }

        let board_width = surface.width as f64;
        let board_height = surface.height as f64;
        let (mut target_x, mut target_y) = (0.0, 0.0);
        let (mut target_width, mut target_height) = (board_width, board_height);

        if let Some(region) = region {
            if region.is_degenerate() {
                return None;
            }
            let norm_w = clamp(region.width, 1.0 / board_width.max(1.0), 1.0);
            let norm_h = clamp(region.height, 1.0 / board_height.max(1.0), 1.0);
            let norm_x = clamp(region.x, 0.0, 1.0 - norm_w);
            let norm_y = clamp(region.y, 0.0, 1.0 - norm_h);
            target_width = (norm_w * board_width).max(1.0);
            target_height = (norm_h * board_height).max(1.0);
            target_x = clamp(norm_x * board_width, 0.0, (board_width - target_width).max(0.0));
            target_y = clamp(norm_y * board_height, 0.0, (board_height - target_height).max(0.0));
        }

        let scale = (target_width / source_width as f64).min(target_height / source_height as f64);
        let draw_width = source_width as f64 * scale;
        let draw_height = source_height as f64 * scale;
        let offset_x = clamp(
            target_x + (target_width - draw_width) / 2.0,
            0.0,
            (board_width - draw_width).max(0.0),
        );
        let offset_y = clamp(
            target_y + (target_height - draw_height) / 2.0,
            0.0,
            (board_height - draw_height).max(0.0),
        );

        Some(Self {
            board_width,
            board_height,
            target_x,
            target_y,
            target_width,
            target_height,
            scale,
            offset_x,
            offset_y,
            draw_width,
            draw_height,
            region_active: region.is_some(),
        })
    }
}
