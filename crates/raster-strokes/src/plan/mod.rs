//! Stroke planning.
//!
//! The planner maps the assignment grid onto the drawing surface and turns
//! each horizontal run of one palette index into a bundle of strokes:
//!
//! 1. fill lanes fanned around the row centerline,
//! 2. a micro accent for very short runs, otherwise an offset accent for runs
//!    touching detail or edges,
//! 3. an edge-center accent,
//! 4. optional glaze, echo and texture-weave layers.
//!
//! Output stays grouped by palette index; ordering happens in
//! [`crate::output`]. A plan holds at most [`MAX_PLANNED_STROKES`] strokes.

mod lanes;
mod planner;
mod region;
mod stroke;

pub use lanes::LaneModel;
pub use planner::{PlannedStrokes, StrokePlanner, MAX_PLANNED_STROKES};
pub use region::{Placement, Region, RegionSignature, SurfaceSize};
pub use stroke::{Orientation, Phase, RawStroke};
pub(crate) use stroke::StrokeSink;
