//! The processor taking validated run parameters to downloadable results.

use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::config::RunConfig;
use crate::error::Result;
use crate::glue::{GluemncbigTool, MncGlue, NetcdfFormat};
use crate::outputs;
use crate::params::RunParameters;
use crate::runner;

/// One published result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Location in the download directory
    pub path: PathBuf,
    /// Bare file name, unique per job
    pub filename: String,
    /// Public link the file is served under
    pub href: String,
}

/// The three files produced by a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionArtifacts {
    /// Merged model grid
    pub grid: Artifact,
    /// Merged model state
    pub state: Artifact,
    /// Captured model stdout
    pub stdout: Artifact,
}

/// Core processor for the wrapped simulation.
///
/// Owns the run configuration and the NetCDF merge strategy. One `execute`
/// call runs the whole pipeline on the calling thread. Executions share the
/// run directory, so concurrent calls race on its files.
pub struct GyreProcessor {
    config: RunConfig,
    process_id: String,
    glue: Box<dyn MncGlue>,
}

impl GyreProcessor {
    /// Create a processor with an explicit merge implementation.
    pub fn new(config: RunConfig, process_id: impl Into<String>, glue: Box<dyn MncGlue>) -> Self {
        Self {
            config,
            process_id: process_id.into(),
            glue,
        }
    }

    /// Create a processor merging through the configured `gluemncbig` tool.
    pub fn with_gluemncbig(config: RunConfig, process_id: impl Into<String>) -> Self {
        let tool = GluemncbigTool::new(config.gluemncbig.clone());
        Self::new(config, process_id, Box::new(tool))
    }

    /// The run configuration this processor was built with.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the full pipeline for one job.
    ///
    /// Blocks until the model exits and the results are merged. On failure
    /// the download directory is left without the job's files.
    pub fn execute(&self, job_id: &str, params: &RunParameters) -> Result<ExecutionArtifacts> {
        info!(job_id, ?params, "Starting simulation job");

        // Install the patched namelist into the run directory
        namelist::patch_file(
            &self.config.namelist_template,
            &self.config.staged_namelist(),
            &self.config.live_namelist(),
            &params.namelist_patches(),
        )?;

        // Regenerate the forcing grids with the requested amplitudes
        forcing::write_forcing_files(
            &self.config.forcing_dir,
            &self.config.grid,
            &params.surface_forcing(),
        )?;

        // Run the model to completion
        let stdout = runner::run_model(&self.config.binary, &self.config.run_dir)?;

        // Publish captured stdout
        let stdout_artifact = self.artifact(job_id, "stdout", "txt");
        fs::write(&stdout_artifact.path, &stdout)?;

        // Merge the per-tile output into one file per kind
        let shards = outputs::collect_shards(&self.config.mnc_dir)?;
        let grid_artifact = self.artifact(job_id, "grid", "nc");
        let state_artifact = self.artifact(job_id, "state", "nc");
        self.glue
            .glue(&grid_artifact.path, &shards.grid, NetcdfFormat::Classic)?;
        self.glue
            .glue(&state_artifact.path, &shards.state, NetcdfFormat::Classic)?;

        info!(
            job_id,
            grid = %grid_artifact.path.display(),
            state = %state_artifact.path.display(),
            stdout = %stdout_artifact.path.display(),
            "Simulation job finished"
        );

        Ok(ExecutionArtifacts {
            grid: grid_artifact,
            state: state_artifact,
            stdout: stdout_artifact,
        })
    }

    /// Name one result file and its public link for this job.
    fn artifact(&self, job_id: &str, kind: &str, extension: &str) -> Artifact {
        let filename = format!(
            "outputs-{}-{}-{}.{}",
            kind, self.process_id, job_id, extension
        );
        Artifact {
            path: self.config.download_dir.join(&filename),
            href: format!(
                "{}/{}",
                self.config.download_url.trim_end_matches('/'),
                filename
            ),
            filename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forcing::DomainGrid;

    fn dummy_config() -> RunConfig {
        RunConfig {
            binary: PathBuf::from("/opt/gyre/build/mitgcmuv"),
            run_dir: PathBuf::from("/opt/gyre/run"),
            namelist_template: PathBuf::from("/opt/gyre/run/data.template"),
            forcing_dir: PathBuf::from("/opt/gyre/run"),
            mnc_dir: PathBuf::from("/opt/gyre/run/mnc_test_0001"),
            download_dir: PathBuf::from("/var/www/downloads"),
            download_url: "http://localhost:8087/downloads/".to_string(),
            gluemncbig: PathBuf::from("/opt/gyre/tools/gluemncbig"),
            grid: DomainGrid::default(),
        }
    }

    struct NoopGlue;

    impl MncGlue for NoopGlue {
        fn glue(&self, _: &std::path::Path, _: &[PathBuf], _: NetcdfFormat) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn artifact_names_carry_process_and_job_id() {
        let processor = GyreProcessor::new(dummy_config(), "baroclinic-gyre", Box::new(NoopGlue));
        let artifact = processor.artifact("7031e57d", "grid", "nc");
        assert_eq!(artifact.filename, "outputs-grid-baroclinic-gyre-7031e57d.nc");
        assert_eq!(
            artifact.path,
            PathBuf::from("/var/www/downloads/outputs-grid-baroclinic-gyre-7031e57d.nc")
        );
    }

    #[test]
    fn href_never_doubles_the_slash() {
        // download_url in the fixture ends with a slash
        let processor = GyreProcessor::new(dummy_config(), "baroclinic-gyre", Box::new(NoopGlue));
        let artifact = processor.artifact("j1", "stdout", "txt");
        assert_eq!(
            artifact.href,
            "http://localhost:8087/downloads/outputs-stdout-baroclinic-gyre-j1.txt"
        );
    }
}
