// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for diamond-norm computations.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. config.yaml file
//! 3. Environment variables (QUBITOS_DIAMOND_*, QUBITOS_LOG_LEVEL)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Conic solver settings
    #[serde(default)]
    pub solver: SolverConfig,

    /// Distance computation settings
    #[serde(default)]
    pub distance: DistanceConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Input limits
    #[serde(default)]
    pub limits: ResourceLimits,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["config.yaml", "config.yml", "/etc/qubitos/diamond.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("QUBITOS_DIAMOND_MAX_ITERATIONS") {
            self.solver.max_iterations = val.parse().map_err(|_| {
                Error::Config(format!("QUBITOS_DIAMOND_MAX_ITERATIONS: invalid value '{}'", val))
            })?;
        }
        if let Ok(val) = env::var("QUBITOS_DIAMOND_TOLERANCE") {
            self.solver.tolerance = val.parse().map_err(|_| {
                Error::Config(format!("QUBITOS_DIAMOND_TOLERANCE: invalid value '{}'", val))
            })?;
        }
        if let Ok(val) = env::var("QUBITOS_DIAMOND_FORMULATION") {
            self.distance.formulation = val.parse()?;
        }
        if let Ok(val) = env::var("QUBITOS_DIAMOND_MAX_CHANNEL_DIM") {
            self.limits.max_channel_dim = val.parse().map_err(|_| {
                Error::Config(format!("QUBITOS_DIAMOND_MAX_CHANNEL_DIM: invalid value '{}'", val))
            })?;
        }
        if let Ok(val) = env::var("QUBITOS_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("QUBITOS_LOG_FORMAT") {
            self.logging.format = val;
        }
        Ok(())
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.solver.max_iterations == 0 {
            return Err(Error::Config("solver.max_iterations cannot be 0".into()));
        }
        if !(self.solver.tolerance.is_finite() && self.solver.tolerance > 0.0) {
            return Err(Error::Config(format!(
                "solver.tolerance must be a positive finite number, got {}",
                self.solver.tolerance
            )));
        }
        if self.limits.max_channel_dim == 0 {
            return Err(Error::Config("limits.max_channel_dim cannot be 0".into()));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(Error::Config(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }
        // Loose tolerances make the three distance formulations disagree
        if self.solver.tolerance > 1e-3 {
            tracing::warn!(
                tolerance = self.solver.tolerance,
                "Solver tolerance is loose; reported norms may be inaccurate"
            );
        }
        Ok(())
    }
}

/// Conic solver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Iteration cap passed to the solver
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Convergence tolerance (relative accuracy)
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Log a warning when the solver stops short of optimality
    #[serde(default = "default_true")]
    pub warn_on_non_optimal: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            warn_on_non_optimal: true,
        }
    }
}

fn default_max_iterations() -> usize {
    100_000
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_true() -> bool {
    true
}

/// SDP used for the diamond-norm distance.
///
/// All three give the same value at optimality; they differ in size and in
/// how quickly a first-order solver converges on them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DistanceFormulation {
    /// Maximize over `W` with `0 ⪯ W ⪯ I ⊗ ρ`
    #[default]
    Primal,
    /// Minimize `‖Tr_Y Z‖∞` with `Z ⪰ 0`, `Z ⪰ J`
    Dual,
    /// Minimize `½(‖Tr_Y Y0‖∞ + ‖Tr_Y Y1‖∞)` with a block constraint
    Alt,
}

impl fmt::Display for DistanceFormulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceFormulation::Primal => write!(f, "primal"),
            DistanceFormulation::Dual => write!(f, "dual"),
            DistanceFormulation::Alt => write!(f, "alt"),
        }
    }
}

impl std::str::FromStr for DistanceFormulation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "primal" => Ok(DistanceFormulation::Primal),
            "dual" => Ok(DistanceFormulation::Dual),
            "alt" | "alternative" => Ok(DistanceFormulation::Alt),
            other => Err(Error::Config(format!(
                "unknown distance formulation '{}' (expected primal, dual or alt)",
                other
            ))),
        }
    }
}

/// Distance computation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceConfig {
    /// Formulation used by `diamond_norm_distance`
    #[serde(default)]
    pub formulation: DistanceFormulation,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Resource limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Largest channel dimension `d` accepted (superoperator side `d²`).
    ///
    /// The SDP has `O(d⁴)` variables, so this guards against inputs the
    /// solver cannot finish.
    #[serde(default = "default_max_channel_dim")]
    pub max_channel_dim: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_channel_dim: default_max_channel_dim(),
        }
    }
}

fn default_max_channel_dim() -> usize {
    8
}
