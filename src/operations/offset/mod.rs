//! Offset curves and stroke outlines.

mod curve_offset_2d;
mod stroke_outline;
mod stroke_style;

pub use curve_offset_2d::CurveOffset2D;
pub use stroke_outline::{Outline, StrokeOutline2D};
pub use stroke_style::{LineCap, LineJoin, StrokeStyle};
