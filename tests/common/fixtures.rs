//! PNG fixtures built in memory.

/// Encode RGBA pixels as a PNG
pub fn png_rgba(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    encode(width, height, png::ColorType::Rgba, rgba)
}

/// Encode RGB pixels as a PNG
pub fn png_rgb(width: u32, height: u32, rgb: &[u8]) -> Vec<u8> {
    encode(width, height, png::ColorType::Rgb, rgb)
}

fn encode(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("PNG header");
        writer.write_image_data(data).expect("PNG data");
    }
    out
}

/// Single opaque color
pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let data: Vec<u8> = (0..width * height).flat_map(|_| rgb).collect();
    png_rgb(width, height, &data)
}

/// Left half black, right half white
pub fn split(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::new();
    for _ in 0..height {
        for x in 0..width {
            let v = if x < width / 2 { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    png_rgb(width, height, &data)
}

/// Four quadrants in red, green, blue and yellow
pub fn quadrants(size: u32) -> Vec<u8> {
    let half = size / 2;
    let mut data = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let rgb = match (x < half, y < half) {
                (true, true) => [220, 30, 30],
                (false, true) => [30, 200, 40],
                (true, false) => [30, 40, 210],
                (false, false) => [240, 220, 20],
            };
            data.extend_from_slice(&rgb);
        }
    }
    png_rgb(size, size, &data)
}

/// Every pixel fully transparent
pub fn transparent(width: u32, height: u32) -> Vec<u8> {
    png_rgba(width, height, &vec![0; (width * height * 4) as usize])
}
