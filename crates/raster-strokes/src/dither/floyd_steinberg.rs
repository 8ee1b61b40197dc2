//! Serpentine Floyd-Steinberg error diffusion.

use super::assignment::AssignmentMap;
use super::kernel::{Kernel, FLOYD_STEINBERG};
use super::options::DitherOptions;
use super::Dither;
use crate::palette::Palette;
use crate::preprocess::PixelBuffer;

/// Floyd-Steinberg error diffusion with serpentine scanning.
///
/// ```text
///  even rows (→)        odd rows (←)
///        X   7          7   X
///    3   5   1          1   5   3
/// ```
///
/// All weights are multiplied by [`DitherOptions::strength`].
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(
        &self,
        buffer: &PixelBuffer,
        palette: &Palette,
        options: &DitherOptions,
    ) -> AssignmentMap {
        dither_with_kernel(buffer, palette, &FLOYD_STEINBERG, options)
    }
}

/// Plain nearest-color quantization, no error propagated.
pub fn nearest_assignment(buffer: &PixelBuffer, palette: &Palette) -> AssignmentMap {
    dither_with_kernel(
        buffer,
        palette,
        &FLOYD_STEINBERG,
        &DitherOptions::new().strength(0.0),
    )
}

/// Core error diffusion loop parameterized by kernel.
///
/// Working state is one `f64` accumulator per channel and pixel, seeded from
/// the source. Each visited opaque pixel is clamped into `0..=255` before
/// matching, and its residual is handed to in-bounds opaque neighbors.
pub fn dither_with_kernel(
    buffer: &PixelBuffer,
    palette: &Palette,
    kernel: &Kernel,
    options: &DitherOptions,
) -> AssignmentMap {
    let (width, height) = (buffer.width(), buffer.height());
    let mut output = AssignmentMap::skipped(width, height);
    if palette.is_empty() {
        return output;
    }

    let total = width * height;
    let mut acc: Vec<[f64; 3]> = (0..total).map(|i| buffer.rgb(i).to_f64()).collect();
    let colors: Vec<[f64; 3]> = palette.entries().iter().map(|e| e.rgb.to_f64()).collect();
    let weights: Vec<(i32, i32, f64)> = kernel
        .fractions()
        .map(|(dx, dy, f)| (dx, dy, f * options.strength))
        .collect();
    let diffuse = options.diffuses();

    for y in 0..height {
        let reverse = y % 2 == 1;
        let x_range: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..width).rev())
        } else {
            Box::new(0..width)
        };

        for x in x_range {
            let idx = y * width + x;
            if !buffer.is_opaque(idx) {
                continue;
            }

            let source = acc[idx].map(|c| c.clamp(0.0, 255.0));
            let nearest = palette.find_nearest(source);
            output.set(idx, nearest as u16);

            if !diffuse {
                continue;
            }

            let target = colors[nearest];
            let error = [
                source[0] - target[0],
                source[1] - target[1],
                source[2] - target[2],
            ];

            for &(dx, dy, weight) in &weights {
                let dx = if reverse { -dx } else { dx };
                let nx = x as i64 + dx as i64;
                let ny = y as i64 + dy as i64;
                if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                let n = ny as usize * width + nx as usize;
                if !buffer.is_opaque(n) {
                    continue;
                }
                for c in 0..3 {
                    acc[n][c] += error[c] * weight;
                }
            }
        }
    }

    output
}
