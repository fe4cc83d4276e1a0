// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Conic solver seam.
//!
//! [`ConicSolver`] is the boundary between the reduction and whatever solves
//! the resulting real SDP. [`TotsuSolver`] is the bundled backend, built on
//! the pure-Rust `totsu` first-order conic solver.

use std::fmt;

use serde::{Deserialize, Serialize};
use totsu::prelude::*;
use totsu::{MatBuild, ProbSDP};
use tracing::debug;

use super::problem::{ObjectiveSense, RealSdp};
use crate::config::SolverConfig;
use crate::error::{Error, Result};

type La = FloatGeneric<f64>;
type AMatBuild = MatBuild<La>;
type AProbSDP = ProbSDP<La>;
type ASolver = Solver<La>;

/// Termination status reported by a solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveStatus {
    /// Converged to the requested accuracy
    Optimal,
    /// Stopped without a certified optimum
    NotOptimal { reason: String },
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::NotOptimal { reason } => write!(f, "not optimal ({})", reason),
        }
    }
}

/// Result of a single solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub status: SolveStatus,
    /// Objective value in the problem's own sense; `NaN` when the solver
    /// produced no iterate.
    pub value: f64,
    /// Primal point, empty when unavailable.
    pub solution: Vec<f64>,
}

/// A backend able to solve a [`RealSdp`].
///
/// `Err` means the problem could not be handed to the backend at all. A run
/// that ends without convergence is an `Ok` outcome with
/// [`SolveStatus::NotOptimal`].
pub trait ConicSolver: Send + Sync {
    /// Backend name.
    fn name(&self) -> &str;

    /// Solve the problem.
    fn solve(&self, problem: &RealSdp) -> Result<SolverOutcome>;
}

/// [`ConicSolver`] backed by `totsu::ProbSDP`.
///
/// totsu solves `min cᵗx s.t. Σ xᵢFᵢ + Fₙ ⪯ 0, Ax = b`. All PSD blocks of the
/// problem are stacked into one block-diagonal LMI `G(x) ⪰ 0`, passed as
/// `F = −G`; maximization negates `c`.
#[derive(Debug, Clone, Default)]
pub struct TotsuSolver {
    config: SolverConfig,
}

impl TotsuSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl ConicSolver for TotsuSolver {
    fn name(&self) -> &str {
        "totsu"
    }

    fn solve(&self, problem: &RealSdp) -> Result<SolverOutcome> {
        let n = problem.num_vars();
        let k = problem.lmi_dim();
        let p = problem.equalities().len();
        if n == 0 {
            return Err(Error::Solver("problem has no variables".into()));
        }
        if k == 0 {
            return Err(Error::Solver("problem has no PSD constraints".into()));
        }

        let sign = match problem.sense() {
            ObjectiveSense::Minimize => 1.0,
            ObjectiveSense::Maximize => -1.0,
        };
        let mut vec_c = AMatBuild::new(MatType::General(n, 1));
        for (i, ci) in problem.objective_vector().into_iter().enumerate() {
            vec_c[(i, 0)] = sign * ci;
        }

        // syms_f[i] multiplies x[i]; syms_f[n] is the constant term
        let mut syms_f: Vec<AMatBuild> = (0..=n)
            .map(|_| AMatBuild::new(MatType::SymPack(k)))
            .collect();
        let mut offset = 0;
        for block in problem.blocks() {
            for e in block.entries() {
                let slot = e.var.unwrap_or(n);
                syms_f[slot][(offset + e.row, offset + e.col)] -= e.value;
            }
            offset += block.dim();
        }

        let mut mat_a = AMatBuild::new(MatType::General(p, n));
        let mut vec_b = AMatBuild::new(MatType::General(p, 1));
        for (row, eq) in problem.equalities().iter().enumerate() {
            for &(var, coef) in &eq.coeffs {
                mat_a[(row, var)] += coef;
            }
            vec_b[(row, 0)] = eq.rhs;
        }

        let max_iter = self.config.max_iterations;
        let eps_acc = self.config.tolerance;
        let solver = ASolver::new().par(|par| {
            par.max_iter = Some(max_iter);
            par.eps_acc = eps_acc;
        });

        debug!(
            variables = n,
            lmi_dim = k,
            equalities = p,
            blocks = problem.blocks().len(),
            max_iter,
            eps_acc,
            "Solving SDP with totsu"
        );

        let mut sdp = AProbSDP::new(vec_c, syms_f, mat_a, vec_b, solver.par.eps_zero);
        let outcome = match solver.solve(sdp.problem()) {
            Ok((x, _)) => {
                let solution = x[..n].to_vec();
                SolverOutcome {
                    status: SolveStatus::Optimal,
                    value: problem.objective_value(&solution),
                    solution,
                }
            }
            Err(e) => SolverOutcome {
                status: SolveStatus::NotOptimal {
                    reason: format!("{:?}", e),
                },
                value: f64::NAN,
                solution: Vec::new(),
            },
        };

        Ok(outcome)
    }
}
