// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Complex-to-real embedding of matrices.
//!
//! A complex `n × n` matrix `C = R + iI` is mapped to the real `2n × 2n`
//! block matrix
//!
//! ```text
//!   [[ R,  I ],
//!    [-I,  R ]]
//! ```
//!
//! The map is an injective *-homomorphism onto its image (it represents
//! `C̄` acting on `ℝ²ⁿ`), so `C` is Hermitian iff its embedding is
//! symmetric, and `C ⪰ 0` iff its embedding is PSD. This is how complex PSD
//! constraints reach a real-only conic solver.

use ndarray::{s, Array2, ArrayView2};
use num_complex::Complex64;

use crate::error::{Error, Result, ShapeError};

/// Embed a complex matrix given as separate real and imaginary parts.
///
/// Fails with [`Error::DimensionMismatch`] if the parts differ in shape.
pub fn embed_parts(real: ArrayView2<f64>, imag: ArrayView2<f64>) -> Result<Array2<f64>> {
    if real.dim() != imag.dim() {
        return Err(Error::DimensionMismatch {
            expected: real.dim(),
            actual: imag.dim(),
        });
    }
    Ok(assemble(real, imag))
}

/// Embed a complex matrix.
pub fn embed(m: &Array2<Complex64>) -> Array2<f64> {
    let real = m.mapv(|z| z.re);
    let imag = m.mapv(|z| z.im);
    assemble(real.view(), imag.view())
}

fn assemble(real: ArrayView2<f64>, imag: ArrayView2<f64>) -> Array2<f64> {
    let (rows, cols) = real.dim();
    let mut out = Array2::zeros((2 * rows, 2 * cols));
    out.slice_mut(s![..rows, ..cols]).assign(&real);
    out.slice_mut(s![..rows, cols..]).assign(&imag);
    out.slice_mut(s![rows.., ..cols]).assign(&imag.mapv(|x| -x));
    out.slice_mut(s![rows.., cols..]).assign(&real);
    out
}

/// Half-sizes of an embedded matrix; both sides must be even.
fn half_dims(m: &Array2<f64>) -> Result<(usize, usize)> {
    let (rows, cols) = m.dim();
    for side in [rows, cols] {
        if side % 2 != 0 {
            return Err(ShapeError::OddDimension { side }.into());
        }
    }
    Ok((rows / 2, cols / 2))
}

/// Real part of an embedded matrix (top-left quadrant).
pub fn unembed_real(m: &Array2<f64>) -> Result<Array2<f64>> {
    let (rows, cols) = half_dims(m)?;
    Ok(m.slice(s![..rows, ..cols]).to_owned())
}

/// Imaginary part of an embedded matrix (top-right quadrant).
pub fn unembed_imag(m: &Array2<f64>) -> Result<Array2<f64>> {
    let (rows, cols) = half_dims(m)?;
    Ok(m.slice(s![..rows, cols..]).to_owned())
}

/// Reconstruct the complex matrix from its embedding.
pub fn unembed(m: &Array2<f64>) -> Result<Array2<Complex64>> {
    let real = unembed_real(m)?;
    let imag = unembed_imag(m)?;
    Ok(Array2::from_shape_fn(real.dim(), |idx| {
        Complex64::new(real[idx], imag[idx])
    }))
}

/// Trace of the real quadrant of an embedded matrix.
///
/// For a Hermitian matrix this equals its (real) trace. The embedding also
/// carries an imaginary-trace degree of freedom; it is not inspected here.
pub fn trace_of_real_part(m: &Array2<f64>) -> Result<f64> {
    Ok(unembed_real(m)?.diag().sum())
}
