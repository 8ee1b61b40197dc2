//! PNG decoding into pixel buffers.

use raster_strokes::{resize_to_fit, PixelBuffer};
use std::io::Cursor;
use std::path::Path;

use crate::error::LoadError;

/// Upper bound on decoded image area
pub const MAX_PIXELS: u64 = 50_000_000;

/// Decode PNG bytes into an RGBA buffer.
///
/// Palette, grayscale and 16-bit images are expanded to 8-bit RGBA.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    if width as u64 * height as u64 > MAX_PIXELS {
        return Err(LoadError::TooLarge {
            width,
            height,
            max: MAX_PIXELS,
        });
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let data = &buf[..frame.buffer_size()];

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(LoadError::Unsupported(format!(
            "bit depth {:?}",
            frame.bit_depth
        )));
    }

    let pixels = (frame.width * frame.height) as usize;
    let rgba = match frame.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => expand(data, pixels, 3, |p| [p[0], p[1], p[2], 255]),
        png::ColorType::GrayscaleAlpha => expand(data, pixels, 2, |p| [p[0], p[0], p[0], p[1]]),
        png::ColorType::Grayscale => expand(data, pixels, 1, |p| [p[0], p[0], p[0], 255]),
        other => {
            return Err(LoadError::Unsupported(format!("color type {other:?}")));
        }
    };

    tracing::debug!(
        width = frame.width,
        height = frame.height,
        color_type = ?frame.color_type,
        "Decoded PNG"
    );

    Ok(PixelBuffer::new(
        frame.width as usize,
        frame.height as usize,
        rgba,
    )?)
}

fn expand(data: &[u8], pixels: usize, channels: usize, f: impl Fn(&[u8]) -> [u8; 4]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(pixels * 4);
    for p in data.chunks_exact(channels).take(pixels) {
        rgba.extend_from_slice(&f(p));
    }
    rgba
}

/// Decode and downscale so the longest side is at most `max_dimension`.
pub fn load_png_bytes(bytes: &[u8], max_dimension: usize) -> Result<PixelBuffer, LoadError> {
    let buffer = decode_png(bytes)?;
    Ok(resize_to_fit(&buffer, max_dimension))
}

/// Read a PNG file from disk.
pub fn load_png_file(path: &Path, max_dimension: usize) -> Result<PixelBuffer, LoadError> {
    let bytes = std::fs::read(path)?;
    load_png_bytes(&bytes, max_dimension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_decode_rgba() {
        let data = [255, 0, 0, 255, 0, 255, 0, 10];
        let bytes = encode(2, 1, png::ColorType::Rgba, &data);
        let buffer = decode_png(&bytes).unwrap();
        assert_eq!(buffer.width(), 2);
        assert_eq!(buffer.as_bytes(), &data);
        assert!(!buffer.is_opaque(1));
    }

    #[test]
    fn test_decode_rgb_is_opaque() {
        let bytes = encode(1, 2, png::ColorType::Rgb, &[1, 2, 3, 4, 5, 6]);
        let buffer = decode_png(&bytes).unwrap();
        assert_eq!(buffer.as_bytes(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_decode_grayscale() {
        let bytes = encode(2, 1, png::ColorType::Grayscale, &[0, 200]);
        let buffer = decode_png(&bytes).unwrap();
        assert_eq!(buffer.as_bytes(), &[0, 0, 0, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn test_decode_grayscale_alpha() {
        let bytes = encode(1, 1, png::ColorType::GrayscaleAlpha, &[90, 0]);
        let buffer = decode_png(&bytes).unwrap();
        assert_eq!(buffer.as_bytes(), &[90, 90, 90, 0]);
    }

    #[test]
    fn test_empty_and_garbage() {
        assert!(matches!(decode_png(&[]), Err(LoadError::Empty)));
        assert!(matches!(
            decode_png(b"definitely not a png"),
            Err(LoadError::Decode(_))
        ));
    }

    #[test]
    fn test_load_downscales() {
        let data = vec![128u8; 40 * 20 * 3];
        let bytes = encode(40, 20, png::ColorType::Rgb, &data);
        let buffer = load_png_bytes(&bytes, 10).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (10, 5));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        std::fs::write(&path, encode(1, 1, png::ColorType::Rgb, &[9, 9, 9])).unwrap();
        let buffer = load_png_file(&path, 500).unwrap();
        assert_eq!(buffer.rgb(0).to_hex(), "#090909");
    }
}
