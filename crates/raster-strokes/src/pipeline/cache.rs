//! Single-slot memo of the last planned drawing.

use std::sync::Arc;

use crate::output::StrokePlan;
use crate::plan::{RegionSignature, SurfaceSize};
use crate::style::StyleSignature;

/// Everything a cached plan depends on besides the frozen image state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: (usize, usize),
    pub surface: SurfaceSize,
    pub style: StyleSignature,
    pub region: Option<RegionSignature>,
}

/// Holds at most one plan; storing under a new key replaces it.
#[derive(Debug, Default)]
pub struct CommandCache {
    slot: Option<(CacheKey, Arc<StrokePlan>)>,
}

impl CommandCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached plan, if it was built for `key`.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<StrokePlan>> {
        match &self.slot {
            Some((cached, plan)) if cached == key => Some(Arc::clone(plan)),
            _ => None,
        }
    }

    /// Store a plan and hand back the shared handle.
    pub fn store(&mut self, key: CacheKey, plan: StrokePlan) -> Arc<StrokePlan> {
        let plan = Arc::new(plan);
        self.slot = Some((key, Arc::clone(&plan)));
        plan
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}
