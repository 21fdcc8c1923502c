//! Error types for the simulation crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing or running a simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// A request input could not be parsed as the expected number
    #[error("Invalid value for parameter {name}: {value:?}")]
    InvalidParameter { name: &'static str, value: String },

    /// The run configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Patching the run namelist failed
    #[error("Failed to patch run namelist: {0}")]
    Namelist(#[from] namelist::NamelistError),

    /// Writing the forcing grids failed
    #[error("Failed to generate forcing files: {0}")]
    Forcing(#[from] forcing::ForcingError),

    /// The model binary could not be started at all
    #[error("Failed to start model binary {}: {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        source: std::io::Error,
    },

    /// The model ran but reported failure
    #[error("Model run failed with exit code {exit_code}")]
    ModelFailed { exit_code: i32 },

    /// Merging the per-tile NetCDF output failed
    #[error("Failed to merge NetCDF output: {0}")]
    Glue(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;
