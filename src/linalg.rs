// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Small dense linear-algebra helpers shared by the reduction.
//!
//! Vectorization follows the column-major convention used for superoperators
//! throughout the crate: `vec(A)[a + rows·b] = A[a, b]`, so that
//! `vec(A ρ B) = (Bᵗ ⊗ A) vec(ρ)`.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Exact integer square root: `Some(r)` iff `r * r == n`.
pub fn exact_sqrt(n: usize) -> Option<usize> {
    let mut r = (n as f64).sqrt().round() as usize;
    // Float rounding can be off by one for large n
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    (r * r == n).then_some(r)
}

/// Column-major vectorization of a matrix.
pub fn vec_col_major(m: &Array2<Complex64>) -> Array1<Complex64> {
    // Iterating the transposed view in logical order walks m column by column
    m.t().iter().copied().collect()
}

/// Inverse of [`vec_col_major`] for a `rows × cols` matrix.
pub fn unvec_col_major(v: &Array1<Complex64>, rows: usize, cols: usize) -> Array2<Complex64> {
    assert_eq!(v.len(), rows * cols, "vector length must equal rows * cols");
    Array2::from_shape_fn((rows, cols), |(r, c)| v[r + rows * c])
}

/// Kronecker product `a ⊗ b`.
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    Array2::from_shape_fn((ar * br, ac * bc), |(r, c)| {
        a[[r / br, c / bc]] * b[[r % br, c % bc]]
    })
}

/// Conjugate transpose (dagger) of a matrix.
pub fn dagger(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}

/// Complex identity matrix.
pub fn identity(n: usize) -> Array2<Complex64> {
    Array2::from_diag_elem(n, Complex64::new(1.0, 0.0))
}

/// Trace of a square complex matrix.
pub fn trace(m: &Array2<Complex64>) -> Complex64 {
    m.diag().iter().sum()
}

/// Largest absolute entry-wise difference between two matrices.
pub fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    assert_eq!(a.dim(), b.dim(), "shapes must match");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::c;

    #[test]
    fn test_exact_sqrt() {
        assert_eq!(exact_sqrt(0), Some(0));
        assert_eq!(exact_sqrt(1), Some(1));
        assert_eq!(exact_sqrt(16), Some(4));
        assert_eq!(exact_sqrt(81), Some(9));
        assert_eq!(exact_sqrt(15), None);
        assert_eq!(exact_sqrt(17), None);
        assert_eq!(exact_sqrt(1 << 40), Some(1 << 20));
        assert_eq!(exact_sqrt((1 << 40) + 1), None);
    }

    #[test]
    fn test_vec_is_column_major() {
        let m = Array2::from_shape_vec((2, 2), vec![c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0), c(4.0, 0.0)])
            .unwrap();
        // m = [[1, 2], [3, 4]] → vec = [1, 3, 2, 4]
        let v = vec_col_major(&m);
        assert_eq!(v.to_vec(), vec![c(1.0, 0.0), c(3.0, 0.0), c(2.0, 0.0), c(4.0, 0.0)]);
        assert_eq!(unvec_col_major(&v, 2, 2), m);
    }

    #[test]
    fn test_vec_identity_for_products() {
        // vec(A ρ B) = (Bᵗ ⊗ A) vec(ρ)
        let a = Array2::from_shape_vec((2, 2), vec![c(0.0, 1.0), c(2.0, 0.0), c(1.0, -1.0), c(0.5, 0.0)])
            .unwrap();
        let b = Array2::from_shape_vec((2, 2), vec![c(1.0, 0.0), c(0.0, 3.0), c(-2.0, 0.0), c(1.0, 1.0)])
            .unwrap();
        let rho = Array2::from_shape_vec((2, 2), vec![c(0.7, 0.0), c(0.1, 0.2), c(0.1, -0.2), c(0.3, 0.0)])
            .unwrap();

        let lhs = vec_col_major(&a.dot(&rho).dot(&b));
        let rhs = kron(&b.t().to_owned(), &a).dot(&vec_col_major(&rho));
        for (x, y) in lhs.iter().zip(rhs.iter()) {
            assert!((x - y).norm() < 1e-12);
        }
    }

    #[test]
    fn test_kron_shape_and_entries() {
        let a = identity(2);
        let b = Array2::from_shape_vec((1, 2), vec![c(1.0, 0.0), c(0.0, 1.0)]).unwrap();
        let k = kron(&a, &b);
        assert_eq!(k.dim(), (2, 4));
        assert_eq!(k[[0, 1]], c(0.0, 1.0));
        assert_eq!(k[[1, 3]], c(0.0, 1.0));
        assert_eq!(k[[0, 3]], c(0.0, 0.0));
    }

    #[test]
    fn test_dagger_and_trace() {
        let m = Array2::from_shape_vec((2, 2), vec![c(1.0, 1.0), c(2.0, 0.0), c(0.0, 3.0), c(4.0, -1.0)])
            .unwrap();
        let d = dagger(&m);
        assert_eq!(d[[0, 1]], c(0.0, -3.0));
        assert_eq!(d[[1, 0]], c(2.0, 0.0));
        assert_eq!(trace(&m), c(5.0, 0.0));
    }
}
