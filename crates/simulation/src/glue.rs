//! Merging per-tile NetCDF shards into a single file.
//!
//! The actual merge is done by the `gluemncbig` tool shipped with the
//! model's utility scripts. It is deliberately kept behind a trait so the
//! pipeline can be exercised without NetCDF tooling installed.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{Result, SimulationError};

/// NetCDF variants the merge tool can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetcdfFormat {
    /// Classic format, the tool's default
    Classic,
    /// 64-bit offset format for results past the 2 GiB classic limit
    Offset64,
}

/// Merges per-tile NetCDF shards into one file.
pub trait MncGlue: Send + Sync {
    /// Merge `inputs` into `output`, replacing any existing file there.
    fn glue(&self, output: &Path, inputs: &[PathBuf], format: NetcdfFormat) -> Result<()>;
}

/// Runs the external `gluemncbig` tool.
pub struct GluemncbigTool {
    tool: PathBuf,
}

impl GluemncbigTool {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }
}

impl MncGlue for GluemncbigTool {
    fn glue(&self, output: &Path, inputs: &[PathBuf], format: NetcdfFormat) -> Result<()> {
        let mut cmd = Command::new(&self.tool);
        if format == NetcdfFormat::Offset64 {
            cmd.arg("-2");
        }
        cmd.arg("-o").arg(output).args(inputs);

        debug!(
            tool = %self.tool.display(),
            output = %output.display(),
            inputs = inputs.len(),
            "Merging NetCDF shards"
        );

        let run = cmd.output().map_err(|e| {
            SimulationError::Glue(format!("Failed to run {}: {}", self.tool.display(), e))
        })?;

        if !run.status.success() {
            return Err(SimulationError::Glue(format!(
                "{} exited with {}: {}",
                self.tool.display(),
                run.status,
                String::from_utf8_lossy(&run.stderr).trim()
            )));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use test_utils::write_executable;

    // A stand-in tool that records its own command line, one argument per line
    fn recording_tool(dir: &Path) -> (PathBuf, PathBuf) {
        let record = dir.join("args.txt");
        let script = format!(
            "#!/bin/sh\nfor arg in \"$@\"; do echo \"$arg\"; done > \"{}\"\n",
            record.display()
        );
        let tool = write_executable(dir, "gluemncbig", &script);
        (tool, record)
    }

    fn recorded_args(record: &Path) -> Vec<String> {
        fs::read_to_string(record)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn classic_format_passes_output_then_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let (tool, record) = recording_tool(dir.path());

        let glue = GluemncbigTool::new(&tool);
        let inputs = vec![dir.path().join("grid.t001.nc"), dir.path().join("grid.t002.nc")];
        glue.glue(&dir.path().join("grid.nc"), &inputs, NetcdfFormat::Classic)
            .unwrap();

        let args = recorded_args(&record);
        assert_eq!(args[0], "-o");
        assert_eq!(args[1], dir.path().join("grid.nc").display().to_string());
        assert_eq!(args[2], inputs[0].display().to_string());
        assert_eq!(args[3], inputs[1].display().to_string());
        assert_eq!(args.len(), 4);
    }

    #[test]
    fn offset64_format_adds_the_wide_flag() {
        let dir = tempfile::tempdir().unwrap();
        let (tool, record) = recording_tool(dir.path());

        let glue = GluemncbigTool::new(&tool);
        glue.glue(
            &dir.path().join("state.nc"),
            &[dir.path().join("state.t001.nc")],
            NetcdfFormat::Offset64,
        )
        .unwrap();

        let args = recorded_args(&record);
        assert_eq!(args[0], "-2");
        assert_eq!(args[1], "-o");
    }

    #[test]
    fn tool_failure_carries_status_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let tool = write_executable(
            dir.path(),
            "gluemncbig",
            "#!/bin/sh\necho 'no input files' >&2\nexit 2\n",
        );

        let glue = GluemncbigTool::new(&tool);
        let err = glue
            .glue(&dir.path().join("out.nc"), &[], NetcdfFormat::Classic)
            .unwrap_err();
        match err {
            SimulationError::Glue(msg) => {
                assert!(msg.contains("no input files"), "message was: {msg}");
                assert!(msg.contains("exit status: 2"), "message was: {msg}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_tool_is_a_glue_error() {
        let dir = tempfile::tempdir().unwrap();
        let glue = GluemncbigTool::new(dir.path().join("no-such-tool"));
        assert!(matches!(
            glue.glue(&dir.path().join("out.nc"), &[], NetcdfFormat::Classic),
            Err(SimulationError::Glue(_))
        ));
    }
}
