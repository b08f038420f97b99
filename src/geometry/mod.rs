pub mod aabb;
pub mod coord;
pub mod curve;
pub mod path;
pub mod polyline;

pub use aabb::Aabb;
pub use coord::{Coord, GRID_RESOLUTION};
pub use curve::Curve;
pub use path::{commands_from_curves, curves_from_commands, PathBuilder, PathCommand};
pub use polyline::{Polyline, PolylineClosest, PolylineIntersection, PolylineSample};
