// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Real-valued SDP assembly.
//!
//! Formulations are written over complex matrices whose entries are affine in
//! real scalar variables ([`AffineMatrix`]). [`RealSdp::add_psd`] pushes such a
//! matrix through the complex-to-real embedding, so a constraint `A(x) ⪰ 0`
//! on a Hermitian `A` becomes the real symmetric constraint
//! `embed(A(x)) ⪰ 0` that a conic solver understands.
//!
//! Variable parametrizations:
//!
//! - Hermitian `n × n`: `n(n+1)/2` scalars for the real upper triangle
//!   (diagonal included) and `n(n−1)/2` for the strict upper triangle of the
//!   imaginary part. The lower triangle is implied, so the imaginary diagonal
//!   (and hence the imaginary trace) is identically zero.
//! - General complex `n × n`: `2n²` scalars.

use std::collections::BTreeMap;

use ndarray::Array2;
use num_complex::Complex64;

use crate::embedding::embed;
use crate::error::{Result, ShapeError};
use crate::lift::LiftOperator;

/// Index of a real scalar variable in a [`RealSdp`].
pub type VarId = usize;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

// =============================================================================
// Affine matrices
// =============================================================================

/// Complex matrix whose entries are affine functions of real variables.
///
/// Entry `(r, c)` equals `constant[r, c] + Σ coef · x[var]` over the terms
/// recorded for that entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineMatrix {
    constant: Array2<Complex64>,
    terms: Vec<Vec<(VarId, Complex64)>>,
}

impl AffineMatrix {
    /// All-zero `rows × cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            constant: Array2::zeros((rows, cols)),
            terms: vec![Vec::new(); rows * cols],
        }
    }

    /// Constant matrix with no variable terms.
    pub fn from_constant(m: &Array2<Complex64>) -> Self {
        let (rows, cols) = m.dim();
        Self {
            constant: m.clone(),
            terms: vec![Vec::new(); rows * cols],
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.constant.dim()
    }

    fn slot(&self, row: usize, col: usize) -> usize {
        row * self.constant.ncols() + col
    }

    /// Add `coef · x[var]` to entry `(row, col)`.
    pub fn add_term(&mut self, row: usize, col: usize, var: VarId, coef: Complex64) {
        let slot = self.slot(row, col);
        self.terms[slot].push((var, coef));
    }

    /// Add a constant to entry `(row, col)`.
    pub fn add_constant(&mut self, row: usize, col: usize, value: Complex64) {
        self.constant[[row, col]] += value;
    }

    /// Constant part.
    pub fn constant(&self) -> &Array2<Complex64> {
        &self.constant
    }

    /// Variable terms of entry `(row, col)`.
    pub fn terms(&self, row: usize, col: usize) -> &[(VarId, Complex64)] {
        &self.terms[self.slot(row, col)]
    }

    /// Multiply every coefficient and the constant by a real factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            constant: self.constant.mapv(|z| z * factor),
            terms: self
                .terms
                .iter()
                .map(|entry| entry.iter().map(|&(v, c)| (v, c * factor)).collect())
                .collect(),
        }
    }

    /// `self − other`.
    pub fn difference(&self, other: &Self) -> Result<Self> {
        if self.dim() != other.dim() {
            return Err(ShapeError::Mismatch {
                left: self.dim(),
                right: other.dim(),
            }
            .into());
        }
        let mut out = self.clone();
        out.constant = &self.constant - &other.constant;
        for (slot, entry) in other.terms.iter().enumerate() {
            out.terms[slot].extend(entry.iter().map(|&(v, c)| (v, -c)));
        }
        Ok(out)
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        let (rows, cols) = self.dim();
        let mut out = Self::zeros(cols, rows);
        for r in 0..rows {
            for c in 0..cols {
                out.constant[[c, r]] = self.constant[[r, c]].conj();
                let slot = out.slot(c, r);
                out.terms[slot] = self.terms(r, c).iter().map(|&(v, z)| (v, z.conj())).collect();
            }
        }
        out
    }

    /// Assemble `[[top_left, top_right], [bottom_left, bottom_right]]`.
    pub fn block2x2(
        top_left: &Self,
        top_right: &Self,
        bottom_left: &Self,
        bottom_right: &Self,
    ) -> Result<Self> {
        let (r0, c0) = top_left.dim();
        let (r1, c1) = bottom_right.dim();
        for (block, expected) in [(top_right, (r0, c1)), (bottom_left, (r1, c0))] {
            if block.dim() != expected {
                return Err(ShapeError::Mismatch {
                    left: expected,
                    right: block.dim(),
                }
                .into());
            }
        }

        let mut out = Self::zeros(r0 + r1, c0 + c1);
        for (block, (dr, dc)) in [
            (top_left, (0, 0)),
            (top_right, (0, c0)),
            (bottom_left, (r0, 0)),
            (bottom_right, (r0, c0)),
        ] {
            let (rows, cols) = block.dim();
            for r in 0..rows {
                for c in 0..cols {
                    out.constant[[r + dr, c + dc]] = block.constant[[r, c]];
                    let slot = out.slot(r + dr, c + dc);
                    out.terms[slot] = block.terms(r, c).to_vec();
                }
            }
        }
        Ok(out)
    }

    /// `x · I_n` for a scalar variable.
    pub fn scalar_identity(n: usize, var: VarId) -> Self {
        let mut out = Self::zeros(n, n);
        for i in 0..n {
            out.add_term(i, i, var, Complex64::new(1.0, 0.0));
        }
        out
    }

    /// Value of the matrix at the point `x`.
    pub fn evaluate(&self, x: &[f64]) -> Array2<Complex64> {
        let mut out = self.constant.clone();
        for ((r, c), value) in out.indexed_iter_mut() {
            for &(v, coef) in self.terms(r, c) {
                *value += coef * x[v];
            }
        }
        out
    }

    /// Linear functional `Re Σ conj(J[r, c]) · A[r, c]` as variable
    /// coefficients. The constant part is not included.
    ///
    /// For a variable `X = Xr + iXi` this is `Σ Jr∘Xr + Ji∘Xi`.
    pub fn real_inner_product(&self, j: &Array2<Complex64>) -> Result<Vec<(VarId, f64)>> {
        if j.dim() != self.dim() {
            return Err(ShapeError::Mismatch {
                left: self.dim(),
                right: j.dim(),
            }
            .into());
        }
        let mut acc: BTreeMap<VarId, f64> = BTreeMap::new();
        for ((r, c), jrc) in j.indexed_iter() {
            for &(v, coef) in self.terms(r, c) {
                *acc.entry(v).or_insert(0.0) += (jrc.conj() * coef).re;
            }
        }
        Ok(acc.into_iter().filter(|&(_, c)| c != 0.0).collect())
    }
}

impl LiftOperator {
    /// `I_ancilla ⊗ A` for an affine system operator `A`.
    pub fn lift_affine(&self, a: &AffineMatrix) -> Result<AffineMatrix> {
        let s = self.system_dim();
        if a.dim() != (s, s) {
            return Err(ShapeError::Mismatch {
                left: (s, s),
                right: a.dim(),
            }
            .into());
        }
        let big = self.lifted_dim();
        let mut out = AffineMatrix::zeros(big, big);
        for e in self.entries() {
            let (r, c) = e.lifted;
            let (m, n) = e.system;
            out.add_constant(r, c, a.constant[[m, n]] * e.weight);
            for &(v, coef) in a.terms(m, n) {
                out.add_term(r, c, v, coef * e.weight);
            }
        }
        Ok(out)
    }

    /// Partial trace over the ancilla of an affine lifted operator.
    pub fn partial_trace_affine(&self, a: &AffineMatrix) -> Result<AffineMatrix> {
        let big = self.lifted_dim();
        if a.dim() != (big, big) {
            return Err(ShapeError::Mismatch {
                left: (big, big),
                right: a.dim(),
            }
            .into());
        }
        let s = self.system_dim();
        let mut out = AffineMatrix::zeros(s, s);
        for e in self.entries() {
            let (r, c) = e.lifted;
            let (m, n) = e.system;
            out.add_constant(m, n, a.constant[[r, c]] * e.weight);
            for &(v, coef) in a.terms(r, c) {
                out.add_term(m, n, v, coef * e.weight);
            }
        }
        Ok(out)
    }
}

// =============================================================================
// Variable blocks
// =============================================================================

/// Position of `(p, q)`, `p ≤ q`, in the row-major upper triangle.
fn upper_index(n: usize, p: usize, q: usize) -> usize {
    p * n - p * p.saturating_sub(1) / 2 + (q - p)
}

/// Position of `(p, q)`, `p < q`, in the row-major strict upper triangle.
fn strict_upper_index(n: usize, p: usize, q: usize) -> usize {
    p * n - p * (p + 1) / 2 + (q - p - 1)
}

/// Hermitian `n × n` matrix variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HermitianVar {
    n: usize,
    real_start: VarId,
    imag_start: VarId,
}

impl HermitianVar {
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Number of real scalars backing a Hermitian `n × n` variable.
    pub fn scalar_count(n: usize) -> usize {
        n * n
    }

    /// Variable holding `Re H[p, q]` (`p ≤ q`).
    pub fn real_var(&self, p: usize, q: usize) -> VarId {
        let (p, q) = if p <= q { (p, q) } else { (q, p) };
        self.real_start + upper_index(self.n, p, q)
    }

    /// Variable holding `Im H[p, q]` for `p < q`.
    pub fn imag_var(&self, p: usize, q: usize) -> VarId {
        debug_assert!(p < q);
        self.imag_start + strict_upper_index(self.n, p, q)
    }

    /// Variables on the diagonal; their sum is the trace.
    pub fn trace_coeffs(&self) -> Vec<(VarId, f64)> {
        (0..self.n).map(|i| (self.real_var(i, i), 1.0)).collect()
    }

    pub fn to_affine(&self) -> AffineMatrix {
        let n = self.n;
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let mut out = AffineMatrix::zeros(n, n);
        for p in 0..n {
            for q in 0..n {
                out.add_term(p, q, self.real_var(p, q), one);
                if p < q {
                    out.add_term(p, q, self.imag_var(p, q), i);
                } else if p > q {
                    out.add_term(p, q, self.imag_var(q, p), -i);
                }
            }
        }
        out
    }
}

/// General complex `n × n` matrix variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexVar {
    n: usize,
    real_start: VarId,
    imag_start: VarId,
}

impl ComplexVar {
    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn real_var(&self, p: usize, q: usize) -> VarId {
        self.real_start + p * self.n + q
    }

    pub fn imag_var(&self, p: usize, q: usize) -> VarId {
        self.imag_start + p * self.n + q
    }

    pub fn to_affine(&self) -> AffineMatrix {
        let n = self.n;
        let mut out = AffineMatrix::zeros(n, n);
        for p in 0..n {
            for q in 0..n {
                out.add_term(p, q, self.real_var(p, q), Complex64::new(1.0, 0.0));
                out.add_term(p, q, self.imag_var(p, q), Complex64::new(0.0, 1.0));
            }
        }
        out
    }
}

// =============================================================================
// Constraints
// =============================================================================

/// One coefficient of a real symmetric LMI block, stored on or above the
/// diagonal. `var == None` marks the constant part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmiEntry {
    pub row: usize,
    pub col: usize,
    pub var: Option<VarId>,
    pub value: f64,
}

/// Real symmetric block `G(x) ⪰ 0`, the embedding of a Hermitian affine
/// matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct PsdBlock {
    dim: usize,
    entries: Vec<LmiEntry>,
}

impl PsdBlock {
    /// Embed a Hermitian affine `n × n` matrix into a `2n × 2n` block.
    ///
    /// Only the upper triangle of the real quadrants and the imaginary
    /// quadrant `[0..n, n..2n]` are read; the rest follows from symmetry.
    pub fn from_affine(a: &AffineMatrix) -> Result<Self> {
        let (rows, cols) = a.dim();
        if rows != cols {
            return Err(ShapeError::NotSquare { rows, cols }.into());
        }
        let n = rows;
        let mut entries = Vec::new();
        let mut push = |row: usize, col: usize, var: Option<VarId>, value: f64| {
            if value != 0.0 {
                entries.push(LmiEntry { row, col, var, value });
            }
        };

        let constant = embed(&a.constant);
        for r in 0..2 * n {
            for c in r..2 * n {
                push(r, c, None, constant[[r, c]]);
            }
        }

        for p in 0..n {
            for q in 0..n {
                for &(v, coef) in a.terms(p, q) {
                    if p <= q {
                        push(p, q, Some(v), coef.re);
                        push(p + n, q + n, Some(v), coef.re);
                    }
                    push(p, q + n, Some(v), coef.im);
                }
            }
        }

        Ok(Self { dim: 2 * n, entries })
    }

    /// Side length of the real block.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[LmiEntry] {
        &self.entries
    }

    /// Full symmetric block at the point `x`.
    pub fn evaluate(&self, x: &[f64]) -> Array2<f64> {
        let mut out = Array2::zeros((self.dim, self.dim));
        for e in &self.entries {
            let v = match e.var {
                Some(var) => e.value * x[var],
                None => e.value,
            };
            out[[e.row, e.col]] += v;
            if e.row != e.col {
                out[[e.col, e.row]] += v;
            }
        }
        out
    }
}

/// `Σ coef · x[var] = rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearEquality {
    pub coeffs: Vec<(VarId, f64)>,
    pub rhs: f64,
}

// =============================================================================
// Problem
// =============================================================================

/// Real SDP: optimize a linear objective subject to linear equalities and
/// PSD blocks.
#[derive(Debug, Clone)]
pub struct RealSdp {
    sense: ObjectiveSense,
    num_vars: usize,
    objective: Vec<(VarId, f64)>,
    equalities: Vec<LinearEquality>,
    blocks: Vec<PsdBlock>,
}

impl RealSdp {
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            sense,
            num_vars: 0,
            objective: Vec::new(),
            equalities: Vec::new(),
            blocks: Vec::new(),
        }
    }

    fn allocate(&mut self, count: usize) -> VarId {
        let start = self.num_vars;
        self.num_vars += count;
        start
    }

    /// New real scalar variable.
    pub fn add_scalar(&mut self) -> VarId {
        self.allocate(1)
    }

    /// New Hermitian `n × n` variable.
    pub fn add_hermitian(&mut self, n: usize) -> HermitianVar {
        let real_start = self.allocate(n * (n + 1) / 2);
        let imag_start = self.allocate(n * n.saturating_sub(1) / 2);
        HermitianVar {
            n,
            real_start,
            imag_start,
        }
    }

    /// New general complex `n × n` variable.
    pub fn add_complex(&mut self, n: usize) -> ComplexVar {
        let real_start = self.allocate(n * n);
        let imag_start = self.allocate(n * n);
        ComplexVar {
            n,
            real_start,
            imag_start,
        }
    }

    pub fn add_equality(&mut self, coeffs: Vec<(VarId, f64)>, rhs: f64) {
        self.equalities.push(LinearEquality { coeffs, rhs });
    }

    /// Constrain a Hermitian affine matrix to be PSD.
    pub fn add_psd(&mut self, a: &AffineMatrix) -> Result<()> {
        self.blocks.push(PsdBlock::from_affine(a)?);
        Ok(())
    }

    /// Replace the objective coefficients.
    pub fn set_objective(&mut self, coeffs: Vec<(VarId, f64)>) {
        self.objective = coeffs;
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Side length of the block-diagonal LMI formed by all PSD blocks.
    pub fn lmi_dim(&self) -> usize {
        self.blocks.iter().map(PsdBlock::dim).sum()
    }

    pub fn blocks(&self) -> &[PsdBlock] {
        &self.blocks
    }

    pub fn equalities(&self) -> &[LinearEquality] {
        &self.equalities
    }

    /// Dense objective vector of length [`num_vars`](Self::num_vars).
    pub fn objective_vector(&self) -> Vec<f64> {
        let mut c = vec![0.0; self.num_vars];
        for &(v, coef) in &self.objective {
            c[v] += coef;
        }
        c
    }

    /// Objective at the point `x`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().map(|&(v, coef)| coef * x[v]).sum()
    }
}
