use thiserror::Error;

/// Top-level error type for the curve mesh kernel.
#[derive(Debug, Error)]
pub enum CurveMeshError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the planar subdivision.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("no continuation edge found while walking a contour at ({x}, {y})")]
    MissingContinuation { x: i32, y: i32 },

    #[error("cannot resolve a face at vertex ({x}, {y}) with no incident edges")]
    UnresolvedFace { x: i32, y: i32 },
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`CurveMeshError`].
pub type Result<T> = std::result::Result<T, CurveMeshError>;
