// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Choi–Jamiołkowski reshuffle of column-major superoperators.
//!
//! A superoperator `S` on `n × n` operators satisfies
//! `S · vec(ρ) = vec(Φ(ρ))` with column-major `vec`. Viewing `S` as the
//! column-major tensor `T[i1, i2, i3, i4] = S[i1 + n·i2, i3 + n·i4]`, the
//! reshuffle exchanges the outer legs `i1 ↔ i4`:
//!
//! ```text
//!   C[i4 + n·i2, i3 + n·i1] = S[i1 + n·i2, i3 + n·i4]
//! ```
//!
//! The result is `Jᵗ`, the transpose of the Choi matrix
//! `J = Σ_ij Φ(E_ij) ⊗ E_ij` on output ⊗ input. Applying the reshuffle twice
//! returns the input exactly.
//!
//! Ref: Watrous, "The Theory of Quantum Information" (2018), §2.2.2.

use ndarray::Array2;

use crate::error::{Result, ShapeError};
use crate::linalg::exact_sqrt;

/// Reshuffle a superoperator into its (transposed) Choi matrix.
///
/// Fails with [`ShapeError`] unless `m` is square with a perfect-square side.
pub fn choi_involution<T: Clone>(m: &Array2<T>) -> Result<Array2<T>> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(ShapeError::NotSquare { rows, cols }.into());
    }
    let n = exact_sqrt(rows).ok_or(ShapeError::NotPerfectSquare { side: rows })?;

    Ok(Array2::from_shape_fn((rows, cols), |(r, c)| {
        let (i4, i2) = (r % n, r / n);
        let (i3, i1) = (c % n, c / n);
        m[[i1 + n * i2, i3 + n * i4]].clone()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::linalg::{dagger, kron, max_abs_diff};
    use crate::test_utils::c;
    use num_complex::Complex64;

    /// Matrix unit |i⟩⟨j| in dimension d.
    fn unit(i: usize, j: usize, d: usize) -> Array2<Complex64> {
        let mut m = Array2::zeros((d, d));
        m[[i, j]] = c(1.0, 0.0);
        m
    }

    /// Column-major superoperator of ρ ↦ Σ K ρ K†.
    fn kraus_superop(kraus: &[Array2<Complex64>]) -> Array2<Complex64> {
        let d = kraus[0].nrows();
        let mut s = Array2::zeros((d * d, d * d));
        for k in kraus {
            s = s + kron(&k.mapv(|z| z.conj()), k);
        }
        s
    }

    /// Reference Choi matrix J = Σ Φ(E_ij) ⊗ E_ij.
    fn reference_choi(kraus: &[Array2<Complex64>]) -> Array2<Complex64> {
        let d = kraus[0].nrows();
        let mut j = Array2::zeros((d * d, d * d));
        for a in 0..d {
            for b in 0..d {
                let e = unit(a, b, d);
                let mut out = Array2::zeros((d, d));
                for k in kraus {
                    out = out + k.dot(&e).dot(&dagger(k));
                }
                j = j + kron(&out, &e);
            }
        }
        j
    }

    fn amplitude_damping(gamma: f64) -> Vec<Array2<Complex64>> {
        let mut k0 = Array2::zeros((2, 2));
        k0[[0, 0]] = c(1.0, 0.0);
        k0[[1, 1]] = c((1.0 - gamma).sqrt(), 0.0);
        let mut k1 = Array2::zeros((2, 2));
        k1[[0, 1]] = c(gamma.sqrt(), 0.0);
        vec![k0, k1]
    }

    #[test]
    fn test_identity_channel_gives_maximally_entangled_projector() {
        for n in 2..=3 {
            let s = Array2::from_diag_elem(n * n, 1.0_f64);
            let j = choi_involution(&s).unwrap();
            for r in 0..n * n {
                for col in 0..n * n {
                    // |Ω⟩ = Σ_x |x, x⟩ has support on indices x·(n + 1)
                    let expected = if r % (n + 1) == 0 && col % (n + 1) == 0 {
                        1.0
                    } else {
                        0.0
                    };
                    assert_eq!(j[[r, col]], expected, "n={n}, ({r}, {col})");
                }
            }
        }
    }

    #[test]
    fn test_involution_is_self_inverse() {
        for n in 1..=3 {
            let side = n * n;
            let m = Array2::from_shape_fn((side, side), |(r, col)| {
                c(r as f64 - 0.5 * col as f64, (r * side + col) as f64)
            });
            let twice = choi_involution(&choi_involution(&m).unwrap()).unwrap();
            assert_eq!(twice, m);
        }
    }

    #[test]
    fn test_matches_transposed_choi_for_amplitude_damping() {
        let kraus = amplitude_damping(0.3);
        let reshuffled = choi_involution(&kraus_superop(&kraus)).unwrap();
        let expected = reference_choi(&kraus).t().to_owned();
        assert!(max_abs_diff(&reshuffled, &expected) < 1e-14);
    }

    #[test]
    fn test_complex_kraus_operator() {
        // ρ ↦ U ρ U† with U = diag(1, i) · H
        let h = 1.0 / 2.0_f64.sqrt();
        let u = Array2::from_shape_vec((2, 2), vec![c(h, 0.0), c(h, 0.0), c(0.0, h), c(0.0, -h)])
            .unwrap();
        let kraus = vec![u];
        let reshuffled = choi_involution(&kraus_superop(&kraus)).unwrap();
        let expected = reference_choi(&kraus).t().to_owned();
        assert!(max_abs_diff(&reshuffled, &expected) < 1e-14);
    }

    #[test]
    fn test_rejects_non_square() {
        let m = Array2::<f64>::zeros((4, 2));
        let err = choi_involution(&m).unwrap_err();
        assert!(matches!(
            err,
            Error::Shape(ShapeError::NotSquare { rows: 4, cols: 2 })
        ));
    }

    #[test]
    fn test_rejects_non_perfect_square_side() {
        let m = Array2::<f64>::zeros((3, 3));
        let err = choi_involution(&m).unwrap_err();
        assert!(matches!(
            err,
            Error::Shape(ShapeError::NotPerfectSquare { side: 3 })
        ));
    }
}
