// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities for diamond-norm tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nalgebra::DMatrix;
use ndarray::Array2;
use num_complex::Complex64;

use crate::error::Result;
use crate::sdp::{ConicSolver, RealSdp, SolveStatus, SolverOutcome};

/// Mock solver that returns a fixed outcome and counts calls.
pub struct MockSolver {
    pub outcome: SolverOutcome,
    pub calls: Arc<AtomicUsize>,
}

impl MockSolver {
    pub fn new(status: SolveStatus, value: f64) -> Self {
        Self {
            outcome: SolverOutcome {
                status,
                value,
                solution: Vec::new(),
            },
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn optimal(value: f64) -> Self {
        Self::new(SolveStatus::Optimal, value)
    }

    /// Shared handle to the call counter.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl ConicSolver for MockSolver {
    fn name(&self) -> &str {
        "mock"
    }

    fn solve(&self, _problem: &RealSdp) -> Result<SolverOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

/// Shorthand for a complex number.
pub fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Superoperator of the identity channel on `d` dimensions.
pub fn identity_superop(d: usize) -> Array2<Complex64> {
    Array2::from_diag_elem(d * d, c(1.0, 0.0))
}

/// Smallest eigenvalue of a real symmetric matrix.
pub fn min_eigenvalue(m: &Array2<f64>) -> f64 {
    let n = m.nrows();
    let dm = DMatrix::from_fn(n, n, |i, j| m[[i, j]]);
    dm.symmetric_eigen()
        .eigenvalues
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min)
}
