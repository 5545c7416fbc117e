/// Error types for vector, matrix and quaternion operations
use thiserror::Error;

/// Errors raised by the numeric primitives and their consumers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Invalid construction options (e.g. asking for fewer rows than supplied)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operands of an element-wise operation differ in length
    #[error("Size mismatch: {0}")]
    SizeMismatch(String),

    /// Operand shapes are incompatible for a structural operation
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Row, column or element index outside the valid range
    #[error("Index {index} is out of bounds (len: {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A domain-restricted parameter is outside its valid range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A row of the matrix is entirely zero
    #[error("Singular matrix: row {row} is all zeros")]
    Singular { row: usize },

    /// Malformed STL input
    #[error("STL error: {0}")]
    Stl(String),
}

/// Result type for qm3d operations
pub type Result<T> = std::result::Result<T, MathError>;

impl MathError {
    pub(crate) fn size_mismatch(expected: usize, actual: usize) -> Self {
        MathError::SizeMismatch(format!("expected {}, got {}", expected, actual))
    }

    pub(crate) fn out_of_bounds(index: usize, len: usize) -> Self {
        MathError::IndexOutOfBounds { index, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MathError::size_mismatch(3, 4).to_string(),
            "Size mismatch: expected 3, got 4"
        );
        assert_eq!(
            MathError::out_of_bounds(900, 3).to_string(),
            "Index 900 is out of bounds (len: 3)"
        );
        assert_eq!(
            MathError::Singular { row: 1 }.to_string(),
            "Singular matrix: row 1 is all zeros"
        );
    }
}
