// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lift operator: the adjoint of the partial trace.
//!
//! For an ancilla of dimension `a` and a system of dimension `s`, the lift
//! operator `E` is the sparse `(a²s²) × s²` matrix with
//!
//! ```text
//!   E · vec(ρ) = vec(I_a ⊗ ρ)
//!   Eᵗ · vec(σ ⊗ ρ) = tr(σ) · vec(ρ)
//! ```
//!
//! in column-major vectorization. It is assembled as
//! `E = Σ_{m,n<s} Σ_{k<a} vec(|k,m⟩⟨k,n|) · vec(|m⟩⟨n|)ᵗ`.
//!
//! Building `E` is `O(a·s²)` sparse work and depends only on `(a, s)`, so
//! [`LiftCache`] keeps the most recently built operator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex64;
use parking_lot::Mutex;
use sprs::{CsMat, TriMat};
use tracing::debug;

use crate::basis::{basis_row, basis_vector, kron_vectors};
use crate::error::{Result, ShapeError};

/// One nonzero of the lift operator, decoded into matrix coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftEntry {
    /// Entry `(row, col)` of the lifted `as × as` operator.
    pub lifted: (usize, usize),
    /// Entry `(row, col)` of the `s × s` system operator.
    pub system: (usize, usize),
    /// Coefficient (always 1.0 for the standard lift).
    pub weight: f64,
}

/// Sparse lift operator for a fixed `(ancilla_dim, system_dim)` pair.
#[derive(Debug, Clone)]
pub struct LiftOperator {
    ancilla_dim: usize,
    system_dim: usize,
    matrix: CsMat<f64>,
}

/// Build the lift operator `E` with `E·vec(ρ) = vec(I_ancilla ⊗ ρ)`.
pub fn build_lift_operator(ancilla_dim: usize, system_dim: usize) -> LiftOperator {
    let s = system_dim;
    let big = ancilla_dim * system_dim;
    let mut tri = TriMat::new((big * big, s * s));

    for n in 0..s {
        for m in 0..s {
            // vec(|m⟩⟨n|)ᵗ
            let row = basis_row(m + s * n, s * s);
            for k in 0..ancilla_dim {
                // vec(|k,m⟩⟨k,n|) = |k,n⟩ ⊗ |k,m⟩
                let col = kron_vectors(
                    &basis_vector(k * s + n, big),
                    &basis_vector(k * s + m, big),
                );
                for (i, &cv) in col.iter() {
                    for (&rv, (_, j)) in row.iter() {
                        tri.add_triplet(i, j, cv * rv);
                    }
                }
            }
        }
    }

    LiftOperator {
        ancilla_dim,
        system_dim,
        matrix: tri.to_csc(),
    }
}

impl LiftOperator {
    /// Ancilla (identity factor) dimension.
    pub fn ancilla_dim(&self) -> usize {
        self.ancilla_dim
    }

    /// System dimension.
    pub fn system_dim(&self) -> usize {
        self.system_dim
    }

    /// Side length of lifted operators (`ancilla_dim · system_dim`).
    pub fn lifted_dim(&self) -> usize {
        self.ancilla_dim * self.system_dim
    }

    /// Cache key.
    pub fn key(&self) -> (usize, usize) {
        (self.ancilla_dim, self.system_dim)
    }

    /// The sparse matrix `E`.
    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    /// The adjoint `Eᵗ` (partial trace over the ancilla).
    pub fn transpose(&self) -> CsMat<f64> {
        self.matrix.transpose_view().to_owned()
    }

    /// Nonzeros of `E` decoded into lifted and system matrix coordinates.
    pub fn entries(&self) -> impl Iterator<Item = LiftEntry> + '_ {
        let s = self.system_dim;
        let big = self.lifted_dim();
        self.matrix.iter().map(move |(&weight, (row, col))| LiftEntry {
            lifted: (row % big, row / big),
            system: (col % s, col / s),
            weight,
        })
    }

    /// Apply `E`: returns `I_ancilla ⊗ ρ`.
    pub fn lift(&self, rho: &Array2<Complex64>) -> Result<Array2<Complex64>> {
        let s = self.system_dim;
        if rho.dim() != (s, s) {
            return Err(ShapeError::Mismatch {
                left: (s, s),
                right: rho.dim(),
            }
            .into());
        }
        let big = self.lifted_dim();
        let mut out = Array2::zeros((big, big));
        for e in self.entries() {
            out[e.lifted] += rho[e.system] * e.weight;
        }
        Ok(out)
    }

    /// Apply `Eᵗ`: partial trace of `σ` over the ancilla factor.
    pub fn partial_trace(&self, sigma: &Array2<Complex64>) -> Result<Array2<Complex64>> {
        let big = self.lifted_dim();
        if sigma.dim() != (big, big) {
            return Err(ShapeError::Mismatch {
                left: (big, big),
                right: sigma.dim(),
            }
            .into());
        }
        let s = self.system_dim;
        let mut out = Array2::zeros((s, s));
        for e in self.entries() {
            out[e.system] += sigma[e.lifted] * e.weight;
        }
        Ok(out)
    }
}

/// Single-slot memo of the most recently built [`LiftOperator`].
///
/// Requests for the cached `(ancilla_dim, system_dim)` return the shared
/// operator; any other key evicts it. The slot is locked for the duration of
/// a lookup or rebuild, and callers keep the `Arc` they were handed, so a
/// concurrent eviction never changes an operator already in use.
#[derive(Debug, Default)]
pub struct LiftCache {
    slot: Mutex<Option<Arc<LiftOperator>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LiftCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the lift operator for `(ancilla_dim, system_dim)`, building it
    /// on a miss.
    pub fn get_or_build(&self, ancilla_dim: usize, system_dim: usize) -> Arc<LiftOperator> {
        let mut slot = self.slot.lock();

        if let Some(op) = slot.as_ref() {
            if op.key() == (ancilla_dim, system_dim) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(ancilla_dim, system_dim, "Lift operator cache hit");
                return Arc::clone(op);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(
            ancilla_dim,
            system_dim,
            evicted = ?slot.as_ref().map(|op| op.key()),
            "Building lift operator"
        );
        let op = Arc::new(build_lift_operator(ancilla_dim, system_dim));
        *slot = Some(Arc::clone(&op));
        op
    }

    /// Key of the cached operator, if any.
    pub fn cached_key(&self) -> Option<(usize, usize)> {
        self.slot.lock().as_ref().map(|op| op.key())
    }

    /// Number of lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that required a build.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Drop the cached operator.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}
