// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sparse standard-basis vectors used to assemble the lift operator.

use sprs::{CsMat, CsVec};

/// The `i`-th standard basis column vector `|i⟩` in dimension `d`.
///
/// # Panics
/// Panics if `i >= d`.
pub fn basis_vector(i: usize, d: usize) -> CsVec<f64> {
    assert!(i < d, "basis index {i} out of range for dimension {d}");
    CsVec::new(d, vec![i], vec![1.0])
}

/// The conjugate transpose `⟨i|` of [`basis_vector`], as a `1 × d` CSR row.
///
/// # Panics
/// Panics if `i >= d`.
pub fn basis_row(i: usize, d: usize) -> CsMat<f64> {
    assert!(i < d, "basis index {i} out of range for dimension {d}");
    CsMat::new((1, d), vec![0, 1], vec![i], vec![1.0])
}

/// Kronecker product `a ⊗ b` of two sparse vectors.
pub fn kron_vectors(a: &CsVec<f64>, b: &CsVec<f64>) -> CsVec<f64> {
    let db = b.dim();
    let mut indices = Vec::with_capacity(a.nnz() * b.nnz());
    let mut data = Vec::with_capacity(a.nnz() * b.nnz());
    // Outer loop over a keeps the indices sorted
    for (ia, &va) in a.iter() {
        for (ib, &vb) in b.iter() {
            indices.push(ia * db + ib);
            data.push(va * vb);
        }
    }
    CsVec::new(a.dim() * db, indices, data)
}
