//! Final drawing commands.

use std::fmt::Write as _;

use serde::Serialize;

use super::metrics::PlanMetrics;
use crate::plan::Orientation;

/// A colored straight segment in normalized surface coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeCommand {
    /// Lowercase `#rrggbb`.
    pub color: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub orientation: Orientation,
}

impl StrokeCommand {
    /// Render as a socket.io `drawcmd` frame.
    ///
    /// ```
    /// use raster_strokes::{Orientation, StrokeCommand};
    ///
    /// let cmd = StrokeCommand {
    ///     color: "#ff0000".into(),
    ///     x1: 0.1,
    ///     y1: 0.2,
    ///     x2: 0.3,
    ///     y2: 0.25,
    ///     orientation: Orientation::RunPrimary,
    /// };
    /// assert_eq!(
    ///     cmd.to_wire(),
    ///     r##"42["drawcmd",0,[0.100000,0.200000,0.300000,0.250000,false,-1,"#ff0000",0,0,{}]]"##
    /// );
    /// ```
    pub fn to_wire(&self) -> String {
        let mut out = String::with_capacity(96);
        let _ = write!(
            out,
            r#"42["drawcmd",0,[{:.6},{:.6},{:.6},{:.6},false,-1,"{}",0,0,{{}}]]"#,
            self.x1, self.y1, self.x2, self.y2, self.color
        );
        out
    }
}

/// Ordered commands plus the numbers that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokePlan {
    pub commands: Vec<StrokeCommand>,
    pub metrics: PlanMetrics,
    /// Ordering weight per palette entry.
    pub coverage: Vec<f64>,
}

impl StrokePlan {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
