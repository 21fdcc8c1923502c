//! Run configuration for the wrapped simulation.
//!
//! One configuration describes one deployed run directory: where the
//! compiled binary lives, where it runs, and where its results are
//! published. The service loads this once at startup and fails fast on
//! anything unusable, so a request never discovers a broken deployment
//! halfway through a run.

use forcing::DomainGrid;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, SimulationError};

/// Deployment-specific paths and the model grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Path to the compiled model executable
    pub binary: PathBuf,
    /// Working directory the model runs in, holding the live `data` namelist
    pub run_dir: PathBuf,
    /// Pristine namelist used as the patch source
    pub namelist_template: PathBuf,
    /// Directory the forcing grids are written to
    pub forcing_dir: PathBuf,
    /// Directory the model writes its per-tile NetCDF output to
    pub mnc_dir: PathBuf,
    /// Directory merged results and captured stdout are published in
    pub download_dir: PathBuf,
    /// Public base URL under which `download_dir` is served
    pub download_url: String,
    /// Path to the `gluemncbig` merge tool
    pub gluemncbig: PathBuf,
    /// Model grid parameters; defaults to the tutorial domain
    #[serde(default)]
    pub grid: DomainGrid,
}

impl RunConfig {
    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: RunConfig = serde_yaml::from_str(&text)
            .map_err(|e| SimulationError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Loaded run configuration");
        Ok(config)
    }

    /// Check the deployment is usable and create the output directories.
    ///
    /// Called once at service startup. The per-tile output directory is
    /// not checked; the model creates it on its first run.
    pub fn validate(&self) -> Result<()> {
        if !self.binary.is_file() {
            return Err(SimulationError::InvalidConfig(format!(
                "model binary not found: {}",
                self.binary.display()
            )));
        }
        if !self.run_dir.is_dir() {
            return Err(SimulationError::InvalidConfig(format!(
                "run directory not found: {}",
                self.run_dir.display()
            )));
        }
        if !self.namelist_template.is_file() {
            return Err(SimulationError::InvalidConfig(format!(
                "namelist template not found: {}",
                self.namelist_template.display()
            )));
        }
        if !self.gluemncbig.is_file() {
            return Err(SimulationError::InvalidConfig(format!(
                "gluemncbig tool not found: {}",
                self.gluemncbig.display()
            )));
        }
        if self.download_url.trim().is_empty() {
            return Err(SimulationError::InvalidConfig(
                "download_url must not be empty".to_string(),
            ));
        }
        if self.grid.nx < 3 || self.grid.ny < 3 {
            return Err(SimulationError::InvalidConfig(format!(
                "grid must be at least 3x3 to keep ocean inside the land ring, got {}x{}",
                self.grid.nx, self.grid.ny
            )));
        }
        if self.grid.dx <= 0.0 || self.grid.dy <= 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "grid spacing must be positive, got dx={} dy={}",
                self.grid.dx, self.grid.dy
            )));
        }

        fs::create_dir_all(&self.forcing_dir)?;
        fs::create_dir_all(&self.download_dir)?;
        Ok(())
    }

    /// The live namelist the model reads, inside the run directory.
    pub fn live_namelist(&self) -> PathBuf {
        self.run_dir.join("data")
    }

    /// Staging location for the patched namelist before installation.
    pub fn staged_namelist(&self) -> PathBuf {
        self.run_dir.join("data_new")
    }
}
