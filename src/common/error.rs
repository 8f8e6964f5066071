//! Error types for rust_pathfinder

use thiserror::Error;

/// Main error type for grid construction, queries and rendering
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathfinderError {
    /// Coordinate query or mutation outside the grid dimensions
    #[error("Out of bounds: ({x}, {y}) is outside a {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    /// Construction input or a write that would break a grid invariant
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Malformed ASCII grid layout
    #[error("Parse error: {0}")]
    Parse(String),
    /// Plot output failed
    #[error("Visualization error: {0}")]
    Visualization(String),
}

/// Result type alias for pathfinder operations
pub type PathfinderResult<T> = Result<T, PathfinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PathfinderError::InvalidConfiguration("start equals goal".to_string());
        assert_eq!(format!("{}", err), "Invalid configuration: start equals goal");
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = PathfinderError::OutOfBounds { x: 5, y: -1, width: 5, height: 3 };
        assert_eq!(
            err.to_string(),
            "Out of bounds: (5, -1) is outside a 5x3 grid"
        );
    }
}
