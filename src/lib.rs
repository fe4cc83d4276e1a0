// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS Diamond Norm
//!
//! Diamond norms and diamond-norm distances of quantum channels, computed by
//! semidefinite programming.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │     DiamondNorm engine  (sdp)           │
//! ├─────────────────────────────────────────┤
//! │  Formulations: norm, primal, dual, alt  │
//! ├──────────────┬──────────────────────────┤
//! │ Real SDP     │  Choi involution         │
//! │ assembly     │  Lift operator + cache   │
//! │ (embedding)  │  (basis)                 │
//! ├──────────────┴──────────────────────────┤
//! │      ConicSolver  →  TotsuSolver        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Superoperators are `d² × d²` complex matrices acting on column-major
//! vectorized density matrices. [`channels`] builds them from Kraus
//! operators or Lindblad generators.
//!
//! # Modules
//!
//! - [`sdp`]: SDP formulations, solver seam and the [`DiamondNorm`] engine
//! - [`lift`]: the `I ⊗ ρ` lift operator and its cache
//! - [`choi`]: superoperator to Choi matrix reshuffling
//! - [`embedding`]: complex Hermitian to real symmetric embedding
//! - [`basis`]: computational basis helpers
//! - [`channels`]: common channel superoperators
//! - [`io`]: superoperator files
//! - [`config`]: Configuration management
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod basis;
pub mod channels;
pub mod choi;
pub mod config;
pub mod embedding;
pub mod error;
pub mod io;
pub mod lift;
pub mod linalg;
pub mod sdp;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use sdp::{diamond_norm, diamond_norm_distance, DiamondNorm, DiamondNormResult};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
