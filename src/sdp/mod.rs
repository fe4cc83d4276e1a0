// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Diamond norm and diamond-norm distance via semidefinite programming.
//!
//! [`DiamondNorm`] owns the solver backend and the lift-operator cache. Every
//! computation follows the same path:
//!
//! 1. validate the superoperator(s) against [`ResourceLimits`]
//! 2. reshuffle into the Choi matrix and fetch the `(d, d)` lift
//! 3. assemble the real SDP for the requested [`Formulation`]
//! 4. solve, rescale and tag the value with the solver status
//!
//! A solver that stops short of optimality is not an error: the result
//! carries [`SolveStatus::NotOptimal`] and callers decide what to do with it.
//!
//! # Example
//!
//! ```no_run
//! use qubit_os_diamond::channels;
//! use qubit_os_diamond::sdp::diamond_norm_distance;
//!
//! let ideal = channels::identity(2);
//! let noisy = channels::amplitude_damping(0.1)?;
//! let result = diamond_norm_distance(&ideal, &noisy)?;
//! println!("distance = {:.4} ({})", result.value, result.status);
//! # Ok::<(), qubit_os_diamond::Error>(())
//! ```

pub mod formulations;
pub mod problem;
pub mod solver;

use std::fmt;
use std::time::Instant;

use ndarray::Array2;
use num_complex::Complex64;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{Config, DistanceFormulation, ResourceLimits, SolverConfig};
use crate::error::Result;
use crate::lift::LiftCache;
use crate::validation::{validate_hermitian, validate_pair, validate_superoperator};

pub use formulations::{ChoiProblem, Formulation};
pub use problem::{
    AffineMatrix, ComplexVar, HermitianVar, LinearEquality, ObjectiveSense, PsdBlock, RealSdp, VarId,
};
pub use solver::{ConicSolver, SolveStatus, SolverOutcome, TotsuSolver};

/// Relative tolerance for the Hermiticity of `J(L1 − L2)`.
const HERMITIAN_TOL: f64 = 1e-9;

/// Value of a diamond-norm computation tagged with how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiamondNormResult {
    /// Rescaled optimum (`NaN` if the solver produced no iterate)
    pub value: f64,
    /// Solver termination status
    pub status: SolveStatus,
    /// SDP that produced the value
    pub formulation: Formulation,
    /// Channel dimension `d`
    pub dimension: usize,
    /// Solver backend name
    pub solver: String,
}

impl DiamondNormResult {
    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    /// The value if the solver reached optimality.
    pub fn optimal_value(&self) -> Option<f64> {
        self.is_optimal().then_some(self.value)
    }
}

impl fmt::Display for DiamondNormResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6} ({}, d={}, {})",
            self.value, self.formulation, self.dimension, self.status
        )
    }
}

/// Diamond-norm engine.
///
/// Holds the solver backend and a single-slot [`LiftCache`]; repeated calls
/// with the same channel dimension reuse the lift operator. The engine is
/// `Send + Sync` and can be shared across threads.
pub struct DiamondNorm {
    config: SolverConfig,
    formulation: DistanceFormulation,
    limits: ResourceLimits,
    solver: Box<dyn ConicSolver>,
    cache: LiftCache,
}

impl fmt::Debug for DiamondNorm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiamondNorm")
            .field("config", &self.config)
            .field("formulation", &self.formulation)
            .field("limits", &self.limits)
            .field("solver", &self.solver.name())
            .field("cache", &self.cache)
            .finish()
    }
}

impl Default for DiamondNorm {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl DiamondNorm {
    /// Engine with the bundled totsu backend.
    pub fn new(config: SolverConfig) -> Self {
        let solver = Box::new(TotsuSolver::new(config.clone()));
        Self::with_solver(config, solver)
    }

    /// Engine with a custom backend.
    pub fn with_solver(config: SolverConfig, solver: Box<dyn ConicSolver>) -> Self {
        Self {
            config,
            formulation: DistanceFormulation::default(),
            limits: ResourceLimits::default(),
            solver,
            cache: LiftCache::new(),
        }
    }

    /// Engine configured from a full [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.solver.clone())
            .with_formulation(config.distance.formulation)
            .with_limits(config.limits.clone())
    }

    /// Set the formulation used by [`diamond_norm_distance`](Self::diamond_norm_distance).
    pub fn with_formulation(mut self, formulation: DistanceFormulation) -> Self {
        self.formulation = formulation;
        self
    }

    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn formulation(&self) -> DistanceFormulation {
        self.formulation
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Lift-operator cache, for diagnostics.
    pub fn lift_cache(&self) -> &LiftCache {
        &self.cache
    }

    /// Diamond norm `‖Φ‖◇` of a column-major superoperator.
    pub fn diamond_norm(&self, superop: &Array2<Complex64>) -> Result<DiamondNormResult> {
        validate_superoperator(superop, &self.limits)?;
        let problem = ChoiProblem::prepare(superop, &self.cache)?;
        self.run(&problem, Formulation::Norm)
    }

    /// Diamond-norm distance `‖Φ1 − Φ2‖◇` using the configured formulation.
    pub fn diamond_norm_distance(
        &self,
        first: &Array2<Complex64>,
        second: &Array2<Complex64>,
    ) -> Result<DiamondNormResult> {
        let formulation = match self.formulation {
            DistanceFormulation::Primal => Formulation::DistancePrimal,
            DistanceFormulation::Dual => Formulation::DistanceDual,
            DistanceFormulation::Alt => Formulation::DistanceAlt,
        };
        self.distance(first, second, formulation)
    }

    /// Distance via the primal SDP.
    pub fn distance_primal(
        &self,
        first: &Array2<Complex64>,
        second: &Array2<Complex64>,
    ) -> Result<DiamondNormResult> {
        self.distance(first, second, Formulation::DistancePrimal)
    }

    /// Distance via the dual SDP.
    pub fn distance_dual(
        &self,
        first: &Array2<Complex64>,
        second: &Array2<Complex64>,
    ) -> Result<DiamondNormResult> {
        self.distance(first, second, Formulation::DistanceDual)
    }

    /// Distance via the alternative block SDP.
    pub fn distance_alt(
        &self,
        first: &Array2<Complex64>,
        second: &Array2<Complex64>,
    ) -> Result<DiamondNormResult> {
        self.distance(first, second, Formulation::DistanceAlt)
    }

    fn distance(
        &self,
        first: &Array2<Complex64>,
        second: &Array2<Complex64>,
        formulation: Formulation,
    ) -> Result<DiamondNormResult> {
        validate_pair(first, second, &self.limits)?;
        let problem = ChoiProblem::prepare(&(first - second), &self.cache)?;
        validate_hermitian(&problem.choi, HERMITIAN_TOL, "Choi matrix of L1 - L2")?;
        self.run(&problem, formulation)
    }

    fn run(&self, problem: &ChoiProblem, formulation: Formulation) -> Result<DiamondNormResult> {
        let start = Instant::now();
        let sdp = formulation.build(problem)?;
        let outcome = self.solver.solve(&sdp)?;

        if !outcome.status.is_optimal() && self.config.warn_on_non_optimal {
            warn!(
                %formulation,
                dimension = problem.dim,
                status = %outcome.status,
                "Solver did not reach optimality"
            );
        }

        // `+ 0.0` turns a negative zero from the solver into `0.0`
        let value = outcome.value * formulation.scale() + 0.0;
        debug!(
            %formulation,
            dimension = problem.dim,
            value,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Diamond-norm SDP solved"
        );

        Ok(DiamondNormResult {
            value,
            status: outcome.status,
            formulation,
            dimension: problem.dim,
            solver: self.solver.name().to_string(),
        })
    }
}

/// Diamond norm with a default engine.
pub fn diamond_norm(superop: &Array2<Complex64>) -> Result<DiamondNormResult> {
    DiamondNorm::default().diamond_norm(superop)
}

/// Diamond-norm distance with a default engine (primal formulation).
pub fn diamond_norm_distance(
    first: &Array2<Complex64>,
    second: &Array2<Complex64>,
) -> Result<DiamondNormResult> {
    DiamondNorm::default().diamond_norm_distance(first, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ShapeError};
    use crate::test_utils::{identity_superop, MockSolver};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fixed_engine(status: SolveStatus, value: f64) -> (DiamondNorm, Arc<AtomicUsize>) {
        let solver = MockSolver::new(status, value);
        let calls = solver.call_counter();
        (
            DiamondNorm::with_solver(SolverConfig::default(), Box::new(solver)),
            calls,
        )
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiamondNorm>();
    }

    #[test]
    fn test_distance_is_rescaled() {
        let (engine, calls) = fixed_engine(SolveStatus::Optimal, 0.25);
        let r = engine
            .distance_dual(&identity_superop(2), &identity_superop(2))
            .unwrap();
        assert_eq!(r.value, 0.5);
        assert_eq!(r.formulation, Formulation::DistanceDual);
        assert_eq!(r.dimension, 2);
        assert_eq!(r.solver, "mock");
        assert_eq!(r.optimal_value(), Some(0.5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_norm_is_not_rescaled() {
        let (engine, _) = fixed_engine(SolveStatus::Optimal, 1.0);
        let r = engine.diamond_norm(&identity_superop(3)).unwrap();
        assert_eq!(r.value, 1.0);
        assert_eq!(r.formulation, Formulation::Norm);
        assert_eq!(r.dimension, 3);
    }

    #[test]
    fn test_non_optimal_status_is_returned_not_raised() {
        let status = SolveStatus::NotOptimal {
            reason: "ExcessIter".into(),
        };
        let (engine, _) = fixed_engine(status.clone(), 0.4);
        let r = engine.diamond_norm(&identity_superop(2)).unwrap();
        assert_eq!(r.status, status);
        assert_eq!(r.value, 0.4);
        assert_eq!(r.optimal_value(), None);
    }

    #[test]
    fn test_distance_dispatches_on_configured_formulation() {
        for (configured, expected) in [
            (DistanceFormulation::Primal, Formulation::DistancePrimal),
            (DistanceFormulation::Dual, Formulation::DistanceDual),
            (DistanceFormulation::Alt, Formulation::DistanceAlt),
        ] {
            let (engine, _) = fixed_engine(SolveStatus::Optimal, 0.0);
            let engine = engine.with_formulation(configured);
            let r = engine
                .diamond_norm_distance(&identity_superop(2), &identity_superop(2))
                .unwrap();
            assert_eq!(r.formulation, expected);
        }
    }

    #[test]
    fn test_shape_errors_do_not_reach_solver() {
        let (engine, calls) = fixed_engine(SolveStatus::Optimal, 0.0);
        let err = engine.diamond_norm(&Array2::zeros((3, 3))).unwrap_err();
        assert!(matches!(err, Error::Shape(ShapeError::NotPerfectSquare { side: 3 })));

        let err = engine
            .diamond_norm_distance(&identity_superop(2), &identity_superop(3))
            .unwrap_err();
        assert!(matches!(err, Error::Shape(ShapeError::Mismatch { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_limits_are_enforced() {
        let (engine, _) = fixed_engine(SolveStatus::Optimal, 0.0);
        let engine = engine.with_limits(ResourceLimits { max_channel_dim: 2 });
        assert!(matches!(
            engine.diamond_norm(&identity_superop(3)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_distance_rejects_non_hermitian_choi_difference() {
        let (engine, _) = fixed_engine(SolveStatus::Optimal, 0.0);
        let mut skewed = identity_superop(2);
        skewed[[0, 1]] = Complex64::new(0.0, 0.5);
        let err = engine
            .distance_primal(&skewed, &identity_superop(2))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_engine_reuses_lift_operator() {
        let (engine, _) = fixed_engine(SolveStatus::Optimal, 0.0);
        engine.diamond_norm(&identity_superop(2)).unwrap();
        engine
            .distance_alt(&identity_superop(2), &identity_superop(2))
            .unwrap();
        assert_eq!(engine.lift_cache().misses(), 1);
        assert_eq!(engine.lift_cache().hits(), 1);
        engine.diamond_norm(&identity_superop(3)).unwrap();
        assert_eq!(engine.lift_cache().cached_key(), Some((3, 3)));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.distance.formulation = DistanceFormulation::Alt;
        config.limits.max_channel_dim = 3;
        let engine = DiamondNorm::from_config(&config);
        assert_eq!(engine.formulation(), DistanceFormulation::Alt);
        assert_eq!(engine.solver_name(), "totsu");
        assert!(format!("{:?}", engine).contains("totsu"));
    }

    #[test]
    fn test_result_display_and_json() {
        let r = DiamondNormResult {
            value: 1.5,
            status: SolveStatus::Optimal,
            formulation: Formulation::DistancePrimal,
            dimension: 2,
            solver: "totsu".into(),
        };
        assert_eq!(r.to_string(), "1.500000 (distance_primal, d=2, optimal)");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["formulation"], "distance_primal");
        assert_eq!(json["status"]["status"], "optimal");
    }

    #[test]
    fn test_negative_zero_is_reported_as_zero() {
        let (engine, _) = fixed_engine(SolveStatus::Optimal, -0.0);
        let r = engine
            .distance_primal(&identity_superop(2), &identity_superop(2))
            .unwrap();
        assert!(r.value.is_sign_positive());
        assert_eq!(r.to_string(), "0.000000 (distance_primal, d=2, optimal)");
        assert_eq!(serde_json::to_value(&r).unwrap()["value"], 0.0);
        assert!(!serde_json::to_string(&r).unwrap().contains("-0.0"));
    }
}
