// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lindblad generators as column-major superoperators.
//!
//! The generator of
//!
//! ```text
//!   dρ/dt = −i[H, ρ] + Σ_k γ_k (L_k ρ L_k† − ½{L_k†L_k, ρ})
//! ```
//!
//! is, with `vec(AρB) = (Bᵗ ⊗ A) vec(ρ)`,
//!
//! ```text
//!   𝓛 = −i(I ⊗ H − Hᵗ ⊗ I) + Σ_k γ_k (L̄_k ⊗ L_k − ½ I ⊗ L_k†L_k − ½ (L_k†L_k)ᵗ ⊗ I)
//! ```
//!
//! and `exp(t𝓛)` is the channel after evolving for time `t`.
//!
//! Ref: Lindblad (1976), Commun. Math. Phys. 48, 119.
//! Ref: Gorini, Kossakowski, Sudarshan (1976), J. Math. Phys. 17, 821.

use ndarray::Array2;
use num_complex::Complex64;

use super::expm::matrix_exp;
use crate::error::{Result, ShapeError, ValidationError};
use crate::linalg::{dagger, identity, kron};

/// A Lindblad collapse (jump) operator with its rate.
///
/// Common operators for superconducting qubits:
///   - Amplitude damping (T1): L = σ⁻, γ = 1/T1
///   - Pure dephasing (T_φ):   L = σz/2, γ = 1/T_φ
///     where 1/T_φ = 1/T2 − 1/(2T1)
#[derive(Debug, Clone)]
pub struct CollapseOperator {
    /// Operator matrix (d × d).
    pub matrix: Array2<Complex64>,
    /// Decay rate in 1/s.
    pub rate: f64,
    /// Label for provenance (e.g. "T1_q0").
    pub label: String,
}

impl CollapseOperator {
    /// Collapse operator with an explicit rate.
    pub fn new(matrix: Array2<Complex64>, rate: f64, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(ShapeError::NotSquare { rows, cols }.into());
        }
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(ValidationError::PhysicsConstraint(format!(
                "collapse operator '{}' has invalid rate {:.2e}",
                label, rate
            ))
            .into());
        }
        Ok(Self {
            matrix,
            rate,
            label,
        })
    }

    /// T1 collapse operator `σ⁻ = |0⟩⟨1|` with rate `1/T1`.
    pub fn amplitude_damping(t1_us: f64, qubit_label: &str) -> Result<Self> {
        if !(t1_us > 0.0) {
            return Err(ValidationError::Field {
                field: "t1_us".into(),
                message: format!("T1 must be positive, got {t1_us} μs"),
            }
            .into());
        }
        let mut sigma_minus = Array2::zeros((2, 2));
        sigma_minus[[0, 1]] = Complex64::new(1.0, 0.0);
        Self::new(sigma_minus, 1.0 / (t1_us * 1e-6), format!("T1_{qubit_label}"))
    }

    /// Pure dephasing operator `σz/2` with rate `1/T2 − 1/(2T1)`.
    ///
    /// Requires `T2 ≤ 2·T1`.
    pub fn pure_dephasing(t1_us: f64, t2_us: f64, qubit_label: &str) -> Result<Self> {
        if !(t1_us > 0.0) {
            return Err(ValidationError::Field {
                field: "t1_us".into(),
                message: format!("T1 must be positive, got {t1_us} μs"),
            }
            .into());
        }
        if !(t2_us > 0.0) {
            return Err(ValidationError::Field {
                field: "t2_us".into(),
                message: format!("T2 must be positive, got {t2_us} μs"),
            }
            .into());
        }
        if t2_us > 2.0 * t1_us {
            return Err(ValidationError::PhysicsConstraint(format!(
                "T2 ({t2_us} μs) must be ≤ 2*T1 ({} μs)",
                2.0 * t1_us
            ))
            .into());
        }

        let gamma_phi = 1.0 / (t2_us * 1e-6) - 1.0 / (2.0 * t1_us * 1e-6);
        let mut sigma_z_half = Array2::zeros((2, 2));
        sigma_z_half[[0, 0]] = Complex64::new(0.5, 0.0);
        sigma_z_half[[1, 1]] = Complex64::new(-0.5, 0.0);
        // Rounding can push γ_φ slightly negative at T2 = 2·T1
        Self::new(sigma_z_half, gamma_phi.max(0.0), format!("Tphi_{qubit_label}"))
    }

    /// Both T1 and T_φ operators for a single qubit.
    pub fn from_t1_t2(t1_us: f64, t2_us: f64, qubit_label: &str) -> Result<Vec<Self>> {
        Ok(vec![
            Self::amplitude_damping(t1_us, qubit_label)?,
            Self::pure_dephasing(t1_us, t2_us, qubit_label)?,
        ])
    }
}

/// Column-major superoperator of the Lindblad generator.
///
/// `hamiltonian` is in rad/s (ħ = 1); every collapse operator must match its
/// dimension.
pub fn lindblad_generator(
    hamiltonian: &Array2<Complex64>,
    collapse_ops: &[CollapseOperator],
) -> Result<Array2<Complex64>> {
    let (rows, cols) = hamiltonian.dim();
    if rows != cols {
        return Err(ShapeError::NotSquare { rows, cols }.into());
    }
    let d = rows;
    let eye = identity(d);
    let minus_i = Complex64::new(0.0, -1.0);

    let mut generator =
        (kron(&eye, hamiltonian) - kron(&hamiltonian.t().to_owned(), &eye)).mapv(|z| z * minus_i);

    for op in collapse_ops {
        if op.matrix.dim() != (d, d) {
            return Err(ShapeError::Mismatch {
                left: (d, d),
                right: op.matrix.dim(),
            }
            .into());
        }
        if op.rate == 0.0 {
            continue;
        }
        let l = &op.matrix;
        let ldl = dagger(l).dot(l);
        let jump = kron(&l.mapv(|z| z.conj()), l);
        let anti = kron(&eye, &ldl) + kron(&ldl.t().to_owned(), &eye);
        generator.scaled_add(Complex64::new(op.rate, 0.0), &jump);
        generator.scaled_add(Complex64::new(-0.5 * op.rate, 0.0), &anti);
    }

    Ok(generator)
}

/// Channel `exp(t·𝓛)` after evolving under `generator` for `duration_s`.
pub fn evolve(generator: &Array2<Complex64>, duration_s: f64) -> Result<Array2<Complex64>> {
    if !(duration_s.is_finite() && duration_s >= 0.0) {
        return Err(ValidationError::Field {
            field: "duration_s".into(),
            message: format!("must be finite and non-negative, got {}", duration_s),
        }
        .into());
    }
    matrix_exp(&generator.mapv(|z| z * duration_s))
}
