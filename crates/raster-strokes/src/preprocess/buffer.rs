//! Immutable RGBA raster owned by the caller.

use thiserror::Error;

use crate::color::Rgb8;

/// Pixels with alpha below this value are treated as transparent and skipped
/// by every stage.
pub const TRANSPARENCY_THRESHOLD: u8 = 16;

/// Errors raised when constructing a [`PixelBuffer`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelBufferError {
    /// The sample slice does not hold exactly `width * height * 4` bytes.
    #[error("pixel data length mismatch: expected {expected} bytes for {width}x{height}, got {actual}")]
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// A width x height grid of 8-bit RGBA samples in row-major order.
///
/// # Example
///
/// ```
/// use raster_strokes::PixelBuffer;
///
/// let buffer = PixelBuffer::new(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
/// assert!(buffer.is_opaque(0));
/// assert!(!buffer.is_opaque(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap decoded RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PixelBufferError::LengthMismatch`] when `rgba` is not exactly
    /// `width * height * 4` bytes long.
    pub fn new(width: usize, height: usize, rgba: Vec<u8>) -> Result<Self, PixelBufferError> {
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(PixelBufferError::LengthMismatch {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Build a fully opaque buffer from colors in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`PixelBufferError::LengthMismatch`] when `pixels.len()` is not
    /// `width * height`.
    pub fn from_rgb(width: usize, height: usize, pixels: &[Rgb8]) -> Result<Self, PixelBufferError> {
        let mut rgba = Vec::with_capacity(pixels.len() * 4);
        for p in pixels {
            rgba.extend_from_slice(&[p.r, p.g, p.b, 255]);
        }
        Self::new(width, height, rgba)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }

    /// Color channels of the pixel at linear index `idx`.
    #[inline]
    pub fn rgb(&self, idx: usize) -> Rgb8 {
        let o = idx * 4;
        Rgb8::new(self.rgba[o], self.rgba[o + 1], self.rgba[o + 2])
    }

    /// Alpha of the pixel at linear index `idx`.
    #[inline]
    pub fn alpha(&self, idx: usize) -> u8 {
        self.rgba[idx * 4 + 3]
    }

    /// Whether the pixel takes part in quantization and planning.
    #[inline]
    pub fn is_opaque(&self, idx: usize) -> bool {
        self.alpha(idx) >= TRANSPARENCY_THRESHOLD
    }

    /// Count of pixels at or above the transparency threshold.
    pub fn opaque_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_opaque(i)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_is_rejected() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            PixelBufferError::LengthMismatch {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
        assert!(err.to_string().contains("expected 16 bytes for 2x2"));
    }

    #[test]
    fn test_zero_sized_buffer_is_allowed() {
        let buffer = PixelBuffer::new(0, 5, Vec::new()).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.opaque_count(), 0);
    }

    #[test]
    fn test_alpha_threshold_boundary() {
        let buffer = PixelBuffer::new(2, 1, vec![9, 9, 9, 15, 9, 9, 9, 16]).unwrap();
        assert!(!buffer.is_opaque(0));
        assert!(buffer.is_opaque(1));
        assert_eq!(buffer.opaque_count(), 1);
    }

    #[test]
    fn test_from_rgb_is_opaque() {
        let pixels = [Rgb8::new(1, 2, 3), Rgb8::new(4, 5, 6)];
        let buffer = PixelBuffer::from_rgb(1, 2, &pixels).unwrap();
        assert_eq!(buffer.rgb(1), Rgb8::new(4, 5, 6));
        assert_eq!(buffer.alpha(0), 255);
    }
}
