//! Common test fixtures for gyre-sim tests.
//!
//! This module provides a realistic namelist file, a scratch run-directory
//! layout, and helpers for standing in fake executables where tests drive
//! the subprocess path.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A namelist file matching the tutorial run directory, usable as a patch
/// template. Line layout (leading space, `key=value,`) mirrors the real
/// input file.
pub const SAMPLE_NAMELIST: &str = "\
# ====================
# | Model parameters |
# ====================
#
# Continuous equation parameters
 &PARM01
 viscAh=5000.,
 viscAr=1.E-2,
 no_slip_sides=.TRUE.,
 no_slip_bottom=.FALSE.,
 diffKhT=1000.,
 diffKrT=1.E-5,
 eosType='LINEAR',
 tRef=30.,20.,12.,6.,
 tAlpha=2.E-4,
 sBeta=0.,
 rhoNil=999.8,
 gravity=9.81,
 rigidLid=.FALSE.,
 implicitFreeSurface=.TRUE.,
 exactConserv=.TRUE.,
 saltStepping=.FALSE.,
 &

# Elliptic solver parameters
 &PARM02
 cg2dTargetResidual=1.E-7,
 cg2dMaxIters=1000,
 &

# Time stepping parameters
 &PARM03
 startTime=0.,
 endTime=12000.,
 deltaT=1200.,
 pChkptFreq=622080000.,
 chkptFreq=155520000.,
 dumpFreq=31104000.,
 monitorFreq=1200.,
 monitorSelect=2,
 tauThetaClimRelax=5184000.,
 &

# Gridding parameters
 &PARM04
 usingSphericalPolarGrid=.TRUE.,
 delX=62*1.,
 delY=62*1.,
 xgOrigin=-1.,
 ygOrigin=14.,
 delR=50.,60.,100.,290.,
 &

# Input datasets
 &PARM05
 bathyFile='bathy.bin',
 zonalWindFile='windx_cosy.bin',
 thetaClimFile='SST_relax.bin',
 &
";

/// Scratch directory tree shaped like a deployed run directory.
///
/// Keep the returned value alive for the duration of the test; the tree is
/// removed when it drops.
pub struct ScratchRun {
    /// Owns the whole tree
    pub dir: TempDir,
    /// Working directory the model binary runs in
    pub run_dir: PathBuf,
    /// Pristine namelist used as the patch source
    pub namelist_template: PathBuf,
    /// Where forcing grids are written (the run directory, so relative
    /// file names in the namelist resolve)
    pub forcing_dir: PathBuf,
    /// Where the model drops its per-tile NetCDF output
    pub mnc_dir: PathBuf,
    /// Where merged results and captured stdout land
    pub download_dir: PathBuf,
}

/// Build a scratch run layout with the sample namelist installed as both
/// the template and the live `data` file.
pub fn scratch_run() -> ScratchRun {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let run_dir = root.join("run");
    let mnc_dir = run_dir.join("mnc_test_0001");
    let download_dir = root.join("downloads");
    fs::create_dir_all(&mnc_dir).unwrap();
    fs::create_dir_all(&download_dir).unwrap();

    let namelist_template = root.join("data.template");
    fs::write(&namelist_template, SAMPLE_NAMELIST).unwrap();
    fs::write(run_dir.join("data"), SAMPLE_NAMELIST).unwrap();

    ScratchRun {
        forcing_dir: run_dir.clone(),
        run_dir,
        namelist_template,
        mnc_dir,
        download_dir,
        dir,
    }
}

/// Write an executable shell script into `dir` and return its path.
///
/// Used to stand in for the model binary and the merge tool in tests.
#[cfg(unix)]
pub fn write_executable(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// A fake model binary that reports success without producing output.
#[cfg(unix)]
pub fn fake_model_ok(dir: &Path) -> PathBuf {
    write_executable(dir, "mitgcmuv", "#!/bin/sh\necho model run complete\nexit 0\n")
}

/// A fake model binary that fails with the given exit code.
#[cfg(unix)]
pub fn fake_model_failing(dir: &Path, code: i32) -> PathBuf {
    write_executable(
        dir,
        "mitgcmuv",
        &format!("#!/bin/sh\necho boom >&2\nexit {}\n", code),
    )
}
