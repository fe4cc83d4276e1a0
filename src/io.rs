// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Superoperator files.
//!
//! A superoperator is stored as its row-major real part plus an optional
//! imaginary part of the same shape:
//!
//! ```yaml
//! real:
//!   - [1.0, 0.0, 0.0, 0.0]
//!   - [0.0, 1.0, 0.0, 0.0]
//!   - [0.0, 0.0, 1.0, 0.0]
//!   - [0.0, 0.0, 0.0, 1.0]
//! ```
//!
//! Files ending in `.json` are read as JSON, everything else as YAML.

use std::path::Path;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ShapeError, ValidationError};

/// On-disk representation of a complex matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperoperatorFile {
    /// Real part, one inner vector per row
    pub real: Vec<Vec<f64>>,

    /// Imaginary part; absent means zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imag: Option<Vec<Vec<f64>>>,
}

impl SuperoperatorFile {
    /// Read a file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: Self = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        debug!(path = %path.display(), rows = file.real.len(), "Loaded superoperator file");
        Ok(file)
    }

    /// Write the file, choosing the format from its extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Split a complex matrix into real and imaginary rows.
    ///
    /// The imaginary part is omitted when every entry is real.
    pub fn from_matrix(m: &Array2<Complex64>) -> Self {
        let real = m.rows().into_iter().map(|r| r.iter().map(|z| z.re).collect()).collect();
        let imag = if m.iter().any(|z| z.im != 0.0) {
            Some(m.rows().into_iter().map(|r| r.iter().map(|z| z.im).collect()).collect())
        } else {
            None
        };
        Self { real, imag }
    }

    /// Assemble the complex matrix, rejecting ragged or mismatched rows.
    pub fn to_matrix(&self) -> Result<Array2<Complex64>> {
        let rows = self.real.len();
        let cols = row_width(&self.real, "real")?;

        let mut m: Array2<Complex64> = Array2::zeros((rows, cols));
        for (i, row) in self.real.iter().enumerate() {
            for (j, &re) in row.iter().enumerate() {
                m[[i, j]].re = re;
            }
        }

        if let Some(imag) = &self.imag {
            let imag_cols = row_width(imag, "imag")?;
            if (imag.len(), imag_cols) != (rows, cols) {
                return Err(ShapeError::Mismatch {
                    left: (rows, cols),
                    right: (imag.len(), imag_cols),
                }
                .into());
            }
            for (i, row) in imag.iter().enumerate() {
                for (j, &im) in row.iter().enumerate() {
                    m[[i, j]].im = im;
                }
            }
        }
        Ok(m)
    }
}

/// Load a superoperator matrix from a JSON or YAML file.
pub fn load_superoperator(path: &Path) -> Result<Array2<Complex64>> {
    SuperoperatorFile::load(path)?.to_matrix()
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Common row length, or an error naming the first ragged row.
fn row_width(rows: &[Vec<f64>], field: &str) -> Result<usize> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some(i) = rows.iter().position(|r| r.len() != width) {
        return Err(ValidationError::Field {
            field: field.into(),
            message: format!(
                "row {} has {} entries, expected {}",
                i,
                rows[i].len(),
                width
            ),
        }
        .into());
    }
    Ok(width)
}
