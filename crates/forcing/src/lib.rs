//! Forcing-field generation for the baroclinic gyre simulation.
//!
//! Builds the three surface forcing fields the model reads at startup
//! (bathymetry, zonal wind stress, restoring temperature) and writes them
//! as headerless big-endian float32 grid files, the format the model's
//! I/O layer expects.

pub mod fields;
pub mod grid;

pub use fields::{
    bathymetry, restoring_temperature, write_forcing_files, zonal_wind_stress, ForcingFiles,
    SurfaceForcing, BATHYMETRY_FILE, RESTORING_TEMPERATURE_FILE, WIND_STRESS_FILE,
};
pub use grid::{linspace, DomainGrid, Field};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during forcing-field generation.
#[derive(Error, Debug)]
pub enum ForcingError {
    /// Failed to write a grid file to disk
    #[error("Failed to write forcing file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for forcing operations.
pub type Result<T> = std::result::Result<T, ForcingError>;
