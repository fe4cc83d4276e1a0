// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Column-major superoperators for common quantum channels.
//!
//! Every constructor returns `S` with `S · vec(ρ) = vec(Φ(ρ))` under
//! column-major vectorization, the input convention of
//! [`crate::sdp::DiamondNorm`]. A Kraus map `ρ ↦ Σ K ρ K†` has
//! `S = Σ K̄ ⊗ K`.
//!
//! Noise models from device parameters (T1/T2) go through
//! [`lindblad::lindblad_generator`] and [`lindblad::evolve`].
//!
//! Ref: Nielsen & Chuang, "Quantum Computation and Quantum Information"
//! (2010), §8.3.

pub mod expm;
pub mod lindblad;

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{Result, ShapeError, ValidationError};
use crate::linalg::{exact_sqrt, identity as eye, kron, unvec_col_major, vec_col_major};
use crate::validation::validate_probability;

pub use lindblad::{evolve, lindblad_generator, CollapseOperator};

/// Superoperator of `ρ ↦ Σ K ρ K†`.
pub fn from_kraus(kraus: &[Array2<Complex64>]) -> Result<Array2<Complex64>> {
    let first = kraus.first().ok_or_else(|| ValidationError::Field {
        field: "kraus".into(),
        message: "at least one Kraus operator is required".into(),
    })?;
    let (rows, cols) = first.dim();
    if rows != cols {
        return Err(ShapeError::NotSquare { rows, cols }.into());
    }

    let d = rows;
    let mut superop = Array2::zeros((d * d, d * d));
    for k in kraus {
        if k.dim() != (d, d) {
            return Err(ShapeError::Mismatch {
                left: (d, d),
                right: k.dim(),
            }
            .into());
        }
        superop += &kron(&k.mapv(|z| z.conj()), k);
    }
    Ok(superop)
}

/// Identity channel on a `d`-dimensional system.
pub fn identity(d: usize) -> Array2<Complex64> {
    eye(d * d)
}

/// Unitary channel `ρ ↦ U ρ U†`.
pub fn unitary(u: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    from_kraus(std::slice::from_ref(u))
}

/// Depolarizing channel `ρ ↦ (1 − p) ρ + p · tr(ρ) · I/d`.
pub fn depolarizing(d: usize, p: f64) -> Result<Array2<Complex64>> {
    validate_probability(p, "p")?;
    if d == 0 {
        return Err(ValidationError::Field {
            field: "d".into(),
            message: "dimension must be positive".into(),
        }
        .into());
    }
    // p · vec(I/d) · vec(I)ᵗ replaces ρ by tr(ρ) I/d
    let vec_i = vec_col_major(&eye(d));
    let n = d * d;
    let mut superop = eye(n).mapv(|z| z * (1.0 - p));
    for r in 0..n {
        for c in 0..n {
            superop[[r, c]] += vec_i[r] * vec_i[c] * (p / d as f64);
        }
    }
    Ok(superop)
}

/// Completely depolarizing channel `ρ ↦ tr(ρ) · I/d`.
pub fn completely_depolarizing(d: usize) -> Result<Array2<Complex64>> {
    depolarizing(d, 1.0)
}

/// Qubit amplitude damping with decay probability `gamma`.
pub fn amplitude_damping(gamma: f64) -> Result<Array2<Complex64>> {
    validate_probability(gamma, "gamma")?;
    let mut k0 = Array2::zeros((2, 2));
    k0[[0, 0]] = Complex64::new(1.0, 0.0);
    k0[[1, 1]] = Complex64::new((1.0 - gamma).sqrt(), 0.0);
    let mut k1 = Array2::zeros((2, 2));
    k1[[0, 1]] = Complex64::new(gamma.sqrt(), 0.0);
    from_kraus(&[k0, k1])
}

/// Qubit phase damping with dephasing probability `lambda`.
pub fn phase_damping(lambda: f64) -> Result<Array2<Complex64>> {
    validate_probability(lambda, "lambda")?;
    let mut k0 = Array2::zeros((2, 2));
    k0[[0, 0]] = Complex64::new(1.0, 0.0);
    k0[[1, 1]] = Complex64::new((1.0 - lambda).sqrt(), 0.0);
    let mut k1 = Array2::zeros((2, 2));
    k1[[1, 1]] = Complex64::new(lambda.sqrt(), 0.0);
    from_kraus(&[k0, k1])
}

/// Apply a superoperator to an operator: `Φ(ρ)`.
pub fn apply(superop: &Array2<Complex64>, rho: &Array2<Complex64>) -> Result<Array2<Complex64>> {
    let (rows, cols) = superop.dim();
    if rows != cols {
        return Err(ShapeError::NotSquare { rows, cols }.into());
    }
    let d = exact_sqrt(rows).ok_or(ShapeError::NotPerfectSquare { side: rows })?;
    if rho.dim() != (d, d) {
        return Err(ShapeError::Mismatch {
            left: (d, d),
            right: rho.dim(),
        }
        .into());
    }
    Ok(unvec_col_major(&superop.dot(&vec_col_major(rho)), d, d))
}

/// Largest deviation of `vec(I)ᵗ S` from `vec(I)ᵗ`; zero for
/// trace-preserving maps.
pub fn trace_preservation_error(superop: &Array2<Complex64>) -> Result<f64> {
    let (rows, cols) = superop.dim();
    if rows != cols {
        return Err(ShapeError::NotSquare { rows, cols }.into());
    }
    let d = exact_sqrt(rows).ok_or(ShapeError::NotPerfectSquare { side: rows })?;
    let vec_i = vec_col_major(&eye(d));
    let traced = vec_i.dot(superop);
    Ok(traced
        .iter()
        .zip(vec_i.iter())
        .map(|(a, b)| (a - b).norm())
        .fold(0.0, f64::max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{dagger, max_abs_diff, trace};
    use crate::test_utils::c;
    use approx::assert_relative_eq;

    fn sample_rho() -> Array2<Complex64> {
        Array2::from_shape_vec((2, 2), vec![c(0.6, 0.0), c(0.2, -0.1), c(0.2, 0.1), c(0.4, 0.0)])
            .unwrap()
    }

    fn hadamard() -> Array2<Complex64> {
        let h = 1.0 / 2.0_f64.sqrt();
        Array2::from_shape_vec((2, 2), vec![c(h, 0.0), c(h, 0.0), c(h, 0.0), c(-h, 0.0)]).unwrap()
    }

    #[test]
    fn test_identity_channel_leaves_state() {
        let rho = sample_rho();
        assert_eq!(apply(&identity(2), &rho).unwrap(), rho);
    }

    #[test]
    fn test_unitary_matches_direct_conjugation() {
        let u = Array2::from_shape_vec((2, 2), vec![c(0.0, 1.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)])
            .unwrap()
            .dot(&hadamard());
        let rho = sample_rho();
        let out = apply(&unitary(&u).unwrap(), &rho).unwrap();
        let expected = u.dot(&rho).dot(&dagger(&u));
        assert!(max_abs_diff(&out, &expected) < 1e-15);
    }

    #[test]
    fn test_channels_are_trace_preserving() {
        let channels = [
            identity(3),
            unitary(&hadamard()).unwrap(),
            depolarizing(3, 0.3).unwrap(),
            amplitude_damping(0.25).unwrap(),
            phase_damping(0.7).unwrap(),
        ];
        for s in &channels {
            assert!(trace_preservation_error(s).unwrap() < 1e-15);
        }
    }

    #[test]
    fn test_completely_depolarizing_outputs_maximally_mixed() {
        let out = apply(&completely_depolarizing(2).unwrap(), &sample_rho()).unwrap();
        let expected = eye(2).mapv(|z| z * 0.5);
        assert!(max_abs_diff(&out, &expected) < 1e-15);
    }

    #[test]
    fn test_amplitude_damping_populations() {
        let gamma = 0.3;
        let out = apply(&amplitude_damping(gamma).unwrap(), &sample_rho()).unwrap();
        assert_relative_eq!(out[[1, 1]].re, 0.4 * (1.0 - gamma), epsilon = 1e-15);
        assert_relative_eq!(out[[0, 0]].re, 0.6 + 0.4 * gamma, epsilon = 1e-15);
        assert_relative_eq!(trace(&out).re, 1.0, epsilon = 1e-15);
        // Coherences shrink by √(1 − γ)
        assert!((out[[0, 1]] - c(0.2, -0.1) * (1.0 - gamma).sqrt()).norm() < 1e-15);
    }

    #[test]
    fn test_phase_damping_keeps_populations() {
        let lambda = 0.5;
        let out = apply(&phase_damping(lambda).unwrap(), &sample_rho()).unwrap();
        assert_relative_eq!(out[[0, 0]].re, 0.6, epsilon = 1e-15);
        assert!((out[[1, 0]] - c(0.2, 0.1) * (1.0 - lambda).sqrt()).norm() < 1e-15);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(amplitude_damping(1.5).is_err());
        assert!(phase_damping(-0.1).is_err());
        assert!(depolarizing(2, f64::NAN).is_err());
        assert!(depolarizing(0, 0.5).is_err());
        assert!(from_kraus(&[]).is_err());
        assert!(from_kraus(&[eye(2), eye(3)]).is_err());
        assert!(unitary(&Array2::zeros((2, 3))).is_err());
    }

    #[test]
    fn test_apply_rejects_wrong_state_shape() {
        assert!(apply(&identity(2), &eye(3)).is_err());
        assert!(apply(&Array2::zeros((3, 3)), &eye(1)).is_err());
    }

    #[test]
    fn test_non_trace_preserving_map_is_detected() {
        let half = identity(2).mapv(|z| z * 0.5);
        assert_relative_eq!(trace_preservation_error(&half).unwrap(), 0.5, epsilon = 1e-15);
    }
}
