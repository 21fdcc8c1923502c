//! Blocking invocation of the model binary.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{error, info};

use crate::error::{Result, SimulationError};

/// Run the model binary to completion in `run_dir` and return its stdout.
///
/// Blocks until the process exits. The binary reads all of its inputs from
/// the run directory, so the only thing passed is the working directory;
/// stdin is closed to keep the model from waiting on a terminal. Stderr is
/// captured and logged when the run fails.
pub fn run_model(binary: &Path, run_dir: &Path) -> Result<Vec<u8>> {
    info!(
        binary = %binary.display(),
        run_dir = %run_dir.display(),
        "Starting model run"
    );
    let started = Instant::now();

    let output = Command::new(binary)
        .current_dir(run_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| SimulationError::Spawn {
            binary: binary.to_path_buf(),
            source,
        })?;

    // A signal-terminated process has no exit code; report -1 and keep the
    // full status in the log.
    let exit_code = output.status.code().unwrap_or(-1);
    info!(
        exit_code,
        status = %output.status,
        elapsed_secs = started.elapsed().as_secs_f64(),
        stdout_bytes = output.stdout.len(),
        "Model run finished"
    );

    if !output.status.success() {
        error!(
            exit_code,
            stderr = %String::from_utf8_lossy(&output.stderr),
            "Model run failed"
        );
        return Err(SimulationError::ModelFailed { exit_code });
    }

    Ok(output.stdout)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use test_utils::{fake_model_failing, fake_model_ok, scratch_run};

    #[test]
    fn successful_run_returns_stdout() {
        let scratch = scratch_run();
        let binary = fake_model_ok(&scratch.run_dir);
        let stdout = run_model(&binary, &scratch.run_dir).unwrap();
        assert_eq!(String::from_utf8_lossy(&stdout), "model run complete\n");
    }

    #[test]
    fn runs_in_the_requested_working_directory() {
        let scratch = scratch_run();
        let binary = test_utils::write_executable(
            scratch.dir.path(),
            "mitgcmuv",
            "#!/bin/sh\npwd\n",
        );
        let stdout = run_model(&binary, &scratch.run_dir).unwrap();
        let cwd = String::from_utf8_lossy(&stdout);
        assert_eq!(
            std::path::Path::new(cwd.trim()).canonicalize().unwrap(),
            scratch.run_dir.canonicalize().unwrap()
        );
    }

    #[test]
    fn nonzero_exit_surfaces_the_code() {
        let scratch = scratch_run();
        let binary = fake_model_failing(&scratch.run_dir, 9);
        let err = run_model(&binary, &scratch.run_dir).unwrap_err();
        match err {
            SimulationError::ModelFailed { exit_code } => assert_eq!(exit_code, 9),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let scratch = scratch_run();
        let binary = scratch.run_dir.join("no-such-binary");
        let err = run_model(&binary, &scratch.run_dir).unwrap_err();
        match err {
            SimulationError::Spawn { binary: path, .. } => assert_eq!(path, binary),
            other => panic!("unexpected error: {other}"),
        }
    }
}
