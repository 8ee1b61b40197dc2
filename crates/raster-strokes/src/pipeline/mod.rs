//! Per-image state and plan memoization.

mod cache;
mod context;

pub use cache::{CacheKey, CommandCache};
pub use context::PipelineContext;
