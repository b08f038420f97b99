pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{CurveMeshError, Result};
pub use geometry::{Coord, Curve, PathBuilder, PathCommand, Polyline};
pub use topology::{Contour, InsertReport, Mesh, MeshConfig};
