//! Math error types
//!
//! The only failures in this crate: singular inversion, normalizing a
//! zero-length input, and out-of-range element access.

use std::fmt;

/// Error type for math operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// Matrix determinant is zero within tolerance, so it has no inverse
    SingularMatrix { determinant: f64 },
    /// A vector, axis, plane normal or quaternion had zero length
    ZeroLength,
    /// Matrix element index outside `[0, 3] x [0, 3]`
    IndexOutOfRange { row: usize, col: usize },
}

/// Result alias for fallible math operations
pub type MathResult<T> = Result<T, MathError>;

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::SingularMatrix { determinant } => {
                write!(f, "Matrix is not invertible (determinant {})", determinant)
            }
            MathError::ZeroLength => write!(f, "Cannot normalize a zero-length value"),
            MathError::IndexOutOfRange { row, col } => {
                write!(f, "Matrix index ({}, {}) out of range", row, col)
            }
        }
    }
}

impl std::error::Error for MathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular_display() {
        let err = MathError::SingularMatrix { determinant: 0.0 };
        let msg = format!("{}", err);
        assert!(msg.contains("not invertible"));
        assert!(msg.contains("determinant 0"));
    }

    #[test]
    fn test_zero_length_display() {
        let msg = format!("{}", MathError::ZeroLength);
        assert!(msg.contains("zero-length"));
    }

    #[test]
    fn test_index_display() {
        let msg = format!("{}", MathError::IndexOutOfRange { row: 4, col: 1 });
        assert!(msg.contains("(4, 1)"));
        assert!(msg.contains("out of range"));
    }

    #[test]
    fn test_error_source_is_none() {
        use std::error::Error;

        assert!(MathError::ZeroLength.source().is_none());
    }

    #[test]
    fn test_debug_format() {
        let debug = format!("{:?}", MathError::IndexOutOfRange { row: 0, col: 9 });
        assert!(debug.contains("IndexOutOfRange"));
    }
}
