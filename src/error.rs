// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for diamond-norm computations.

use std::fmt;

/// Result type alias for diamond-norm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type.
#[derive(Debug)]
pub enum Error {
    /// Matrix shape does not fit the operation
    Shape(ShapeError),
    /// Real and imaginary parts of an embedding differ in shape
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// Input validation failed
    Validation(ValidationError),
    /// The solver backend could not run the problem at all
    Solver(String),
    /// Configuration error
    Config(String),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Shape(e) => write!(f, "Shape error: {}", e),
            Error::DimensionMismatch { expected, actual } => write!(
                f,
                "Dimension mismatch: expected {}×{}, got {}×{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Solver(msg) => write!(f, "Solver error: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Shape(e) => Some(e),
            Error::Validation(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ShapeError> for Error {
    fn from(e: ShapeError) -> Self {
        Error::Shape(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Shape errors raised while reshaping superoperators and Choi matrices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Matrix is not square
    NotSquare { rows: usize, cols: usize },
    /// Side length is not a perfect square
    NotPerfectSquare { side: usize },
    /// Two operands that must agree in shape do not
    Mismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Real embedding with an odd side length
    OddDimension { side: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::NotSquare { rows, cols } => {
                write!(f, "matrix must be square, got {} × {}", rows, cols)
            }
            ShapeError::NotPerfectSquare { side } => {
                write!(f, "side length {} is not a perfect square", side)
            }
            ShapeError::Mismatch { left, right } => write!(
                f,
                "operand shapes differ: {} × {} vs {} × {}",
                left.0, left.1, right.0, right.1
            ),
            ShapeError::OddDimension { side } => {
                write!(f, "real embedding must have even side, got {}", side)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Validation errors for superoperators and channel parameters.
#[derive(Debug)]
pub enum ValidationError {
    /// Field validation failed
    Field { field: String, message: String },
    /// Physics constraint violated
    PhysicsConstraint(String),
    /// Resource limit exceeded
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, message } => {
                write!(f, "Field '{}': {}", field, message)
            }
            ValidationError::PhysicsConstraint(msg) => {
                write!(f, "Physics constraint violated: {}", msg)
            }
            ValidationError::ResourceLimit {
                resource,
                limit,
                requested,
            } => {
                write!(
                    f,
                    "Resource limit exceeded for {}: limit={}, requested={}",
                    resource, limit, requested
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
