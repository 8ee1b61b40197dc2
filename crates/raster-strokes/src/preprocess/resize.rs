//! Downscale-to-fit with an area-averaging box filter.

use super::buffer::PixelBuffer;

/// Longest side a source image is reduced to before quantization.
pub const DEFAULT_MAX_DIMENSION: usize = 500;

/// Shrink `buffer` so that its longest side is at most `max_dimension`.
///
/// The aspect ratio is kept (`max(1, round(side * scale))` per axis). Images
/// already within the limit are returned unchanged; nothing is ever upscaled.
/// Each destination pixel averages the source block it covers. Colors are
/// weighted by alpha so transparent fringes do not darken edges; alpha is the
/// plain mean.
pub fn resize_to_fit(buffer: &PixelBuffer, max_dimension: usize) -> PixelBuffer {
    let (width, height) = (buffer.width(), buffer.height());
    let longest = width.max(height);
    if max_dimension == 0 || longest <= max_dimension {
        return buffer.clone();
    }

    let scale = max_dimension as f64 / longest as f64;
    let new_width = ((width as f64 * scale).round() as usize).max(1);
    let new_height = ((height as f64 * scale).round() as usize).max(1);

    let src = buffer.as_bytes();
    let mut out = Vec::with_capacity(new_width * new_height * 4);

    for dy in 0..new_height {
        let (y0, y1) = source_span(dy, height, new_height);
        for dx in 0..new_width {
            let (x0, x1) = source_span(dx, width, new_width);

            let mut sums = [0u64; 3];
            let mut alpha_sum = 0u64;
            let mut count = 0u64;
            for sy in y0..y1 {
                for sx in x0..x1 {
                    let o = (sy * width + sx) * 4;
                    let a = src[o + 3] as u64;
                    for c in 0..3 {
                        sums[c] += src[o + c] as u64 * a;
                    }
                    alpha_sum += a;
                    count += 1;
                }
            }

            let mut pixel = [0u8; 4];
            if alpha_sum > 0 {
                for c in 0..3 {
                    pixel[c] = ((sums[c] + alpha_sum / 2) / alpha_sum) as u8;
                }
            }
            pixel[3] = ((alpha_sum + count / 2) / count.max(1)) as u8;
            out.extend_from_slice(&pixel);
        }
    }

    tracing::debug!(
        from_width = width,
        from_height = height,
        to_width = new_width,
        to_height = new_height,
        "Resized source image to fit"
    );

    // Length is new_width * new_height * 4 by construction.
    match PixelBuffer::new(new_width, new_height, out) {
        Ok(resized) => resized,
        Err(_) => buffer.clone(),
    }
}

/// Half-open source range covered by destination index `d`.
#[inline]
fn source_span(d: usize, source_len: usize, dest_len: usize) -> (usize, usize) {
    let start = d * source_len / dest_len;
    let end = ((d + 1) * source_len / dest_len).max(start + 1).min(source_len);
    (start, end)
}
