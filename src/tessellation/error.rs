use crate::geom::GeodesicError;

/// Errors raised while building or rendering a tessellation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TessellationError {
    /// An operation was asked of a face with the wrong number of corners.
    #[error("{operation} requires a {expected} face, got {found} corners")]
    InvalidArity {
        operation: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("degenerate geometry in {operation}: {reason}")]
    DegenerateGeometry {
        operation: &'static str,
        reason: String,
    },
    /// Boundary segments did not join into exactly one closed curve.
    #[error("{segments} boundary segments joined into {pieces} open or separate curves")]
    BoundaryJoinFailure { segments: usize, pieces: usize },
    #[error("{operation}: division counts {count_u} x {count_v} do not fit the pattern")]
    InvalidDivisionCount {
        operation: &'static str,
        count_u: usize,
        count_v: usize,
    },
    #[error("{operation}: invalid {name}: {reason}")]
    InvalidParameter {
        operation: &'static str,
        name: &'static str,
        reason: String,
    },
    #[error("{operation} would create about {estimated} cells, the limit is {limit}")]
    TooManyCells {
        operation: &'static str,
        estimated: usize,
        limit: usize,
    },
    #[error("geometry kernel: {0}")]
    Kernel(String),
}

impl TessellationError {
    pub(crate) fn degenerate(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn parameter(
        operation: &'static str,
        name: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            operation,
            name,
            reason: reason.into(),
        }
    }
}

impl From<GeodesicError> for TessellationError {
    fn from(error: GeodesicError) -> Self {
        match error {
            GeodesicError::CoincidentEndpoints | GeodesicError::NonFiniteEndpoint => {
                Self::degenerate("shortest_path", error.to_string())
            }
            other => Self::Kernel(other.to_string()),
        }
    }
}
