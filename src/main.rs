// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS Diamond Norm CLI
//!
//! Computes diamond norms and diamond-norm distances of superoperators
//! stored in JSON or YAML files.
//!
//! # Usage
//!
//! ```bash
//! # Diamond norm of a single map
//! qubit-os-diamond norm channel.yaml
//!
//! # Distance between two channels, dual SDP, JSON output
//! qubit-os-diamond --json distance ideal.yaml noisy.json --formulation dual
//!
//! # Show effective configuration
//! qubit-os-diamond config
//! ```
//!
//! Exit status is 1 on errors and 2 when the solver stopped short of
//! optimality.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qubit_os_diamond::config::{Config, DistanceFormulation, LoggingConfig};
use qubit_os_diamond::io::load_superoperator;
use qubit_os_diamond::{DiamondNorm, DiamondNormResult, Result, VERSION};

/// QubitOS diamond-norm calculator
#[derive(Parser)]
#[command(name = "qubit-os-diamond")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "Diamond norm and diamond-norm distance of quantum channels")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "QUBITOS_DIAMOND_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diamond norm of a superoperator
    Norm {
        /// Superoperator file (JSON or YAML)
        file: PathBuf,
    },

    /// Diamond-norm distance between two superoperators
    Distance {
        /// First superoperator file
        first: PathBuf,

        /// Second superoperator file
        second: PathBuf,

        /// SDP formulation
        #[arg(short, long, value_enum)]
        formulation: Option<DistanceFormulation>,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Norm { file } => {
            config.validate()?;
            let superop = load_superoperator(&file)?;
            let engine = DiamondNorm::from_config(&config);

            info!(file = %file.display(), "Computing diamond norm");
            let result = engine.diamond_norm(&superop)?;
            report(&result, cli.json)?;
        }

        Commands::Distance {
            first,
            second,
            formulation,
        } => {
            if let Some(formulation) = formulation {
                config.distance.formulation = formulation;
            }
            config.validate()?;

            let l1 = load_superoperator(&first)?;
            let l2 = load_superoperator(&second)?;
            let engine = DiamondNorm::from_config(&config);

            info!(
                first = %first.display(),
                second = %second.display(),
                formulation = %engine.formulation(),
                "Computing diamond-norm distance"
            );
            let result = engine.diamond_norm_distance(&l1, &l2)?;
            report(&result, cli.json)?;
        }

        Commands::Config => {
            // Show effective configuration
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => {
            // Validate configuration
            match config.validate() {
                Ok(()) => {
                    println!("Configuration is valid");
                }
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Print a result and exit with status 2 if it is not optimal.
fn report(result: &DiamondNormResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", result);
    }

    if !result.is_optimal() {
        warn!(status = %result.status, "Result is not certified optimal");
        std::process::exit(2);
    }
    Ok(())
}

/// Initialize logging with tracing.
///
/// Logs go to stderr so stdout carries only results.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
