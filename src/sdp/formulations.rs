// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! The four diamond-norm SDPs.
//!
//! Each builder takes a [`ChoiProblem`] (Choi matrix `J` of a `d`-dimensional
//! map plus the lift operator for `(d, d)`) and returns a [`RealSdp`] whose
//! optimal value, multiplied by [`Formulation::scale`], is the diamond norm
//! (or distance). With `N = d²`:
//!
//! | formulation | optimize | constraints |
//! |---|---|---|
//! | norm | max `Re⟨J, X⟩` | `tr ρ0 = tr ρ1 = 1`, `[[I⊗ρ0, X], [X†, I⊗ρ1]] ⪰ 0` |
//! | primal | max `Re⟨J, W⟩` | `tr ρ = 1`, `0 ⪯ W ⪯ I⊗ρ` |
//! | dual | min `t` | `Z ⪰ 0`, `Z ⪰ J`, `t·I ⪰ Tr_Y Z` |
//! | alt | min `½(t0 + t1)` | `tᵢ·I ⪰ Tr_Y Yᵢ`, `[[Y0, −J/2], [−J†/2, Y1]] ⪰ 0` |
//!
//! Ref: Watrous, "Simpler semidefinite programs for completely bounded
//! norms", Chicago J. Theor. Comput. Sci. (2013).

use std::fmt;
use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::problem::{AffineMatrix, ObjectiveSense, RealSdp};
use crate::choi::choi_involution;
use crate::error::{Result, ShapeError};
use crate::lift::{LiftCache, LiftOperator};
use crate::linalg::{dagger, exact_sqrt};

/// Which SDP produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formulation {
    /// Diamond norm of a single map
    Norm,
    /// Distance, primal form
    DistancePrimal,
    /// Distance, dual form
    DistanceDual,
    /// Distance, alternative block form
    DistanceAlt,
}

impl Formulation {
    /// Factor applied to the SDP optimum.
    ///
    /// The distance programs have optimum `½‖Φ1 − Φ2‖◇`; the norm program
    /// reaches `‖Φ‖◇` directly.
    pub fn scale(self) -> f64 {
        match self {
            Formulation::Norm => 1.0,
            _ => 2.0,
        }
    }

    /// Assemble the SDP for this formulation.
    pub fn build(self, problem: &ChoiProblem) -> Result<RealSdp> {
        match self {
            Formulation::Norm => diamond_norm_sdp(problem),
            Formulation::DistancePrimal => distance_primal_sdp(problem),
            Formulation::DistanceDual => distance_dual_sdp(problem),
            Formulation::DistanceAlt => distance_alt_sdp(problem),
        }
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formulation::Norm => write!(f, "norm"),
            Formulation::DistancePrimal => write!(f, "distance_primal"),
            Formulation::DistanceDual => write!(f, "distance_dual"),
            Formulation::DistanceAlt => write!(f, "distance_alt"),
        }
    }
}

/// Choi matrix of a `d`-dimensional map together with the matching lift.
#[derive(Debug, Clone)]
pub struct ChoiProblem {
    pub dim: usize,
    pub choi: Array2<Complex64>,
    pub lift: Arc<LiftOperator>,
}

impl ChoiProblem {
    /// Reshuffle `superop` and fetch the `(d, d)` lift from `cache`.
    pub fn prepare(superop: &Array2<Complex64>, cache: &LiftCache) -> Result<Self> {
        let choi = choi_involution(superop)?;
        let side = choi.nrows();
        let dim = exact_sqrt(side).ok_or(ShapeError::NotPerfectSquare { side })?;
        let lift = cache.get_or_build(dim, dim);
        Ok(Self { dim, choi, lift })
    }

    fn lifted_dim(&self) -> usize {
        self.dim * self.dim
    }
}

/// Primal diamond norm of a single map.
pub fn diamond_norm_sdp(p: &ChoiProblem) -> Result<RealSdp> {
    let mut sdp = RealSdp::new(ObjectiveSense::Maximize);
    let x = sdp.add_complex(p.lifted_dim());
    let rho0 = sdp.add_hermitian(p.dim);
    let rho1 = sdp.add_hermitian(p.dim);

    let x_aff = x.to_affine();
    sdp.set_objective(x_aff.real_inner_product(&p.choi)?);

    sdp.add_equality(rho0.trace_coeffs(), 1.0);
    sdp.add_equality(rho1.trace_coeffs(), 1.0);
    sdp.add_psd(&rho0.to_affine())?;
    sdp.add_psd(&rho1.to_affine())?;

    let block = AffineMatrix::block2x2(
        &p.lift.lift_affine(&rho0.to_affine())?,
        &x_aff,
        &x_aff.adjoint(),
        &p.lift.lift_affine(&rho1.to_affine())?,
    )?;
    sdp.add_psd(&block)?;
    Ok(sdp)
}

/// Primal diamond-norm distance; `p.choi` is the Choi matrix of `L1 − L2`.
pub fn distance_primal_sdp(p: &ChoiProblem) -> Result<RealSdp> {
    let mut sdp = RealSdp::new(ObjectiveSense::Maximize);
    let w = sdp.add_hermitian(p.lifted_dim());
    let rho = sdp.add_hermitian(p.dim);

    let w_aff = w.to_affine();
    sdp.set_objective(w_aff.real_inner_product(&p.choi)?);

    sdp.add_equality(rho.trace_coeffs(), 1.0);
    sdp.add_psd(&rho.to_affine())?;
    sdp.add_psd(&w_aff)?;
    let gap = p.lift.lift_affine(&rho.to_affine())?.difference(&w_aff)?;
    sdp.add_psd(&gap)?;
    Ok(sdp)
}

/// Dual diamond-norm distance.
pub fn distance_dual_sdp(p: &ChoiProblem) -> Result<RealSdp> {
    let mut sdp = RealSdp::new(ObjectiveSense::Minimize);
    let z = sdp.add_hermitian(p.lifted_dim());
    let t = sdp.add_scalar();
    sdp.set_objective(vec![(t, 1.0)]);

    let z_aff = z.to_affine();
    sdp.add_psd(&z_aff)?;
    sdp.add_psd(&z_aff.difference(&AffineMatrix::from_constant(&p.choi))?)?;
    let bound = AffineMatrix::scalar_identity(p.dim, t)
        .difference(&p.lift.partial_trace_affine(&z_aff)?)?;
    sdp.add_psd(&bound)?;
    Ok(sdp)
}

/// Alternative block-form diamond-norm distance.
pub fn distance_alt_sdp(p: &ChoiProblem) -> Result<RealSdp> {
    let mut sdp = RealSdp::new(ObjectiveSense::Minimize);
    let y0 = sdp.add_hermitian(p.lifted_dim());
    let y1 = sdp.add_hermitian(p.lifted_dim());
    let t0 = sdp.add_scalar();
    let t1 = sdp.add_scalar();
    sdp.set_objective(vec![(t0, 0.5), (t1, 0.5)]);

    let y0_aff = y0.to_affine();
    let y1_aff = y1.to_affine();
    sdp.add_psd(&y0_aff)?;
    sdp.add_psd(&y1_aff)?;
    for (y, t) in [(&y0_aff, t0), (&y1_aff, t1)] {
        let bound = AffineMatrix::scalar_identity(p.dim, t)
            .difference(&p.lift.partial_trace_affine(y)?)?;
        sdp.add_psd(&bound)?;
    }

    let half_j = p.choi.mapv(|z| z * -0.5);
    let block = AffineMatrix::block2x2(
        &y0_aff,
        &AffineMatrix::from_constant(&half_j),
        &AffineMatrix::from_constant(&dagger(&half_j)),
        &y1_aff,
    )?;
    sdp.add_psd(&block)?;
    Ok(sdp)
}
