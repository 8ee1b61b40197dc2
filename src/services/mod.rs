pub mod image_loader;
pub mod stroke_service;
pub mod streamer;

pub use image_loader::{decode_png, load_png_bytes, load_png_file};
pub use stroke_service::{
    palette_report, Drawing, EffectRequest, PaletteSwatch, PlanRequest, SourceInfo, StrokeService,
};
pub use streamer::stream_commands;
