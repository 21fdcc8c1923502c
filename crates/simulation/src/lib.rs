//! Run orchestration for the baroclinic gyre simulation service.
//!
//! Wraps a pre-compiled ocean-model binary behind a typed pipeline:
//!
//! - patch the run namelist with the requested time stepping and viscosity
//! - regenerate the forcing grids from the requested amplitudes
//! - run the model to completion in its run directory
//! - merge the per-tile NetCDF output into downloadable result files
//!
//! The pipeline is fully synchronous; one run owns the run directory from
//! start to finish. Async callers are expected to dispatch [`processor::GyreProcessor::execute`]
//! onto a blocking thread.

pub mod config;
pub mod error;
pub mod glue;
pub mod outputs;
pub mod params;
pub mod processor;
pub mod runner;

// Re-exports
pub use config::RunConfig;
pub use error::{Result, SimulationError};
pub use glue::{GluemncbigTool, MncGlue, NetcdfFormat};
pub use outputs::{collect_shards, ShardSet};
pub use params::{ExecuteInputs, RunParameters};
pub use processor::{Artifact, ExecutionArtifacts, GyreProcessor};
pub use runner::run_model;
