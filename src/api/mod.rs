pub mod effects;
mod query;
pub mod strokes;

pub use effects::{handle_effect, handle_effect_list, EffectInfo, EffectResponse, EffectSummary};
pub use query::ApiQuery;
pub use strokes::{handle_palette, handle_strokes, PaletteResponse, PlanQuery, StrokesResponse};
