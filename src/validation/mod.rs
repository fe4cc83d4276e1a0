// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for superoperators and channel parameters.

use ndarray::Array2;
use num_complex::Complex64;

use crate::config::ResourceLimits;
use crate::error::{Result, ShapeError, ValidationError};
use crate::linalg::exact_sqrt;

/// Validate a column-major superoperator and return its channel dimension.
///
/// The matrix must be square with side `d²`, contain only finite entries,
/// and satisfy `d ≤ limits.max_channel_dim`.
pub fn validate_superoperator(m: &Array2<Complex64>, limits: &ResourceLimits) -> Result<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(ShapeError::NotSquare { rows, cols }.into());
    }
    if rows == 0 {
        return Err(ValidationError::Field {
            field: "superoperator".into(),
            message: "must not be empty".into(),
        }
        .into());
    }
    let d = exact_sqrt(rows).ok_or(ShapeError::NotPerfectSquare { side: rows })?;

    if d > limits.max_channel_dim {
        return Err(ValidationError::ResourceLimit {
            resource: "channel_dim".into(),
            limit: limits.max_channel_dim as u64,
            requested: d as u64,
        }
        .into());
    }

    // Check for NaN or Inf
    for ((r, c), z) in m.indexed_iter() {
        if z.re.is_nan() || z.im.is_nan() {
            return Err(ValidationError::Field {
                field: "superoperator".into(),
                message: format!("contains NaN at ({}, {})", r, c),
            }
            .into());
        }
        if z.re.is_infinite() || z.im.is_infinite() {
            return Err(ValidationError::Field {
                field: "superoperator".into(),
                message: format!("contains Inf at ({}, {})", r, c),
            }
            .into());
        }
    }

    Ok(d)
}

/// Validate two superoperators that are compared against each other.
pub fn validate_pair(
    first: &Array2<Complex64>,
    second: &Array2<Complex64>,
    limits: &ResourceLimits,
) -> Result<usize> {
    if first.dim() != second.dim() {
        return Err(ShapeError::Mismatch {
            left: first.dim(),
            right: second.dim(),
        }
        .into());
    }
    let d = validate_superoperator(first, limits)?;
    validate_superoperator(second, limits)?;
    Ok(d)
}

/// Check that a matrix is Hermitian to within `tol` (relative to its
/// largest entry).
pub fn validate_hermitian(m: &Array2<Complex64>, tol: f64, field: &str) -> Result<()> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(ShapeError::NotSquare { rows, cols }.into());
    }
    let scale = m.iter().map(|z| z.norm()).fold(1.0, f64::max);
    for r in 0..rows {
        for c in r..cols {
            let gap = (m[[r, c]] - m[[c, r]].conj()).norm();
            if gap > tol * scale {
                return Err(ValidationError::PhysicsConstraint(format!(
                    "{} is not Hermitian: |M[{r},{c}] - conj(M[{c},{r}])| = {:.3e}",
                    field, gap
                ))
                .into());
            }
        }
    }
    Ok(())
}

/// Validate a probability-like channel parameter in `[0, 1]`.
pub fn validate_probability(value: f64, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::Field {
            field: field.into(),
            message: format!("must be in [0, 1], got {}", value),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::identity_superop;

    #[test]
    fn test_validate_superoperator() {
        let limits = ResourceLimits::default();

        // Valid superoperators
        assert_eq!(validate_superoperator(&identity_superop(2), &limits).unwrap(), 2);
        assert_eq!(validate_superoperator(&identity_superop(3), &limits).unwrap(), 3);

        // Not square
        let rect = Array2::zeros((4, 2));
        assert!(matches!(
            validate_superoperator(&rect, &limits),
            Err(Error::Shape(ShapeError::NotSquare { .. }))
        ));

        // Side not a perfect square
        let odd = Array2::zeros((3, 3));
        assert!(matches!(
            validate_superoperator(&odd, &limits),
            Err(Error::Shape(ShapeError::NotPerfectSquare { side: 3 }))
        ));

        // Empty
        let empty = Array2::zeros((0, 0));
        assert!(validate_superoperator(&empty, &limits).is_err());
    }

    #[test]
    fn test_validate_superoperator_non_finite() {
        let limits = ResourceLimits::default();
        let mut m = identity_superop(2);
        m[[1, 2]] = Complex64::new(0.0, f64::NAN);
        let err = validate_superoperator(&m, &limits).unwrap_err();
        assert!(err.to_string().contains("NaN at (1, 2)"));

        m[[1, 2]] = Complex64::new(f64::INFINITY, 0.0);
        let err = validate_superoperator(&m, &limits).unwrap_err();
        assert!(err.to_string().contains("Inf at (1, 2)"));
    }

    #[test]
    fn test_validate_superoperator_limit() {
        let limits = ResourceLimits { max_channel_dim: 2 };
        assert!(validate_superoperator(&identity_superop(2), &limits).is_ok());
        assert!(matches!(
            validate_superoperator(&identity_superop(3), &limits),
            Err(Error::Validation(ValidationError::ResourceLimit { limit: 2, requested: 3, .. }))
        ));
    }

    #[test]
    fn test_validate_pair() {
        let limits = ResourceLimits::default();
        assert_eq!(
            validate_pair(&identity_superop(2), &identity_superop(2), &limits).unwrap(),
            2
        );
        assert!(matches!(
            validate_pair(&identity_superop(2), &identity_superop(3), &limits),
            Err(Error::Shape(ShapeError::Mismatch { .. }))
        ));
    }

    #[test]
    fn test_validate_hermitian() {
        let mut m = Array2::from_diag_elem(2, Complex64::new(1.0, 0.0));
        m[[0, 1]] = Complex64::new(0.5, 0.25);
        m[[1, 0]] = Complex64::new(0.5, -0.25);
        assert!(validate_hermitian(&m, 1e-12, "choi").is_ok());

        m[[1, 0]] = Complex64::new(0.5, 0.25);
        let err = validate_hermitian(&m, 1e-12, "choi").unwrap_err();
        assert!(err.to_string().contains("choi is not Hermitian"));
    }

    #[test]
    fn test_validate_probability() {
        assert!(validate_probability(0.0, "gamma").is_ok());
        assert!(validate_probability(1.0, "gamma").is_ok());
        assert!(validate_probability(-0.1, "gamma").is_err());
        assert!(validate_probability(f64::NAN, "gamma").is_err());
    }
}
