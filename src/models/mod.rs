pub mod config;
pub mod overrides;

pub use config::{AppConfig, EffectConfig, SurfaceConfig};
pub use overrides::{parse_region, EffectOverrides, StyleOverrides};
