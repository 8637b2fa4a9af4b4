use thiserror::Error;

/// Top-level error type for the brush editing engine.
#[derive(Debug, Error)]
pub enum ShapeBrushError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Repair(#[from] RepairError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations and corner bookkeeping.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("corner index {index} is out of range for {len} corners")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to the shape store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("shape not found")]
    ShapeNotFound,
}

/// Inputs the engine refuses to work on.
///
/// Callers are not expected to hit these in normal operation.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("polygon needs at least 3 corners, got {count}")]
    PolygonTooSmall { count: usize },

    #[error("brush stroke needs at least 2 points, got {count}")]
    BrushTooShort { count: usize },

    #[error("removing a corner would leave {count} corners")]
    CornerFloor { count: usize },
}

/// Fatal outcomes of the repair loop. Every edit of the gesture has been undone
/// by the time one of these reaches the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepairError {
    #[error("polygon is self-intersecting")]
    Complex,

    #[error("polygon area is too small and no corners can be removed to fix it")]
    AreaTooSmall,

    #[error("repair would leave {count} corners")]
    TooFewCorners { count: usize },
}

/// Errors related to editing operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`ShapeBrushError`].
pub type Result<T> = std::result::Result<T, ShapeBrushError>;
