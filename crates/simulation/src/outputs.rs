//! Classification of the model's per-tile NetCDF output.
//!
//! With the mnc output package active, each run drops one `grid.*.nc` and
//! one `state.*.nc` per tile into the mnc output directory. Merged
//! `grid.nc` and `state.nc` files from an earlier in-place merge also
//! turn up there and must not be fed back into the merge tool.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Per-tile NetCDF shards grouped by kind, sorted by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardSet {
    pub grid: Vec<PathBuf>,
    pub state: Vec<PathBuf>,
}

/// Scan `mnc_dir` for per-tile model output.
///
/// Only `.nc` files whose names start with `grid` or `state` count;
/// previously merged `grid.nc` / `state.nc` files and everything else
/// (pickups, tile logs) are skipped. A run configured without tiling
/// legitimately yields empty shard lists.
pub fn collect_shards(mnc_dir: &Path) -> Result<ShardSet> {
    let mut shards = ShardSet::default();

    for entry in fs::read_dir(mnc_dir)? {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };

        if !name.ends_with(".nc") || name == "grid.nc" || name == "state.nc" {
            debug!(file = name, "Ignoring non-shard file");
        } else if name.starts_with("grid") {
            shards.grid.push(path);
        } else if name.starts_with("state") {
            shards.state.push(path);
        } else {
            debug!(file = name, "Ignoring non-shard file");
        }
    }

    shards.grid.sort();
    shards.state.sort();
    debug!(
        dir = %mnc_dir.display(),
        grid = shards.grid.len(),
        state = shards.state.len(),
        "Collected output shards"
    );
    Ok(shards)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn groups_shards_by_prefix_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "state.0000000000.t002.nc");
        touch(dir.path(), "grid.t002.nc");
        touch(dir.path(), "grid.t001.nc");
        touch(dir.path(), "state.0000000000.t001.nc");

        let shards = collect_shards(dir.path()).unwrap();
        assert_eq!(
            shards.grid,
            vec![dir.path().join("grid.t001.nc"), dir.path().join("grid.t002.nc")]
        );
        assert_eq!(
            shards.state,
            vec![
                dir.path().join("state.0000000000.t001.nc"),
                dir.path().join("state.0000000000.t002.nc")
            ]
        );
    }

    #[test]
    fn skips_merged_outputs_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        // Leftovers of an earlier in-place merge
        touch(dir.path(), "grid.nc");
        touch(dir.path(), "state.nc");
        // Not NetCDF or not shard-prefixed
        touch(dir.path(), "pickup.0000000010.data");
        touch(dir.path(), "STDOUT.0000");
        touch(dir.path(), "monitor.t001.nc");
        // Real shards
        touch(dir.path(), "grid.t001.nc");
        touch(dir.path(), "state.t001.nc");

        let shards = collect_shards(dir.path()).unwrap();
        assert_eq!(shards.grid, vec![dir.path().join("grid.t001.nc")]);
        assert_eq!(shards.state, vec![dir.path().join("state.t001.nc")]);
    }

    #[test]
    fn empty_directory_yields_empty_shard_lists() {
        let dir = tempfile::tempdir().unwrap();
        let shards = collect_shards(dir.path()).unwrap();
        assert!(shards.grid.is_empty());
        assert!(shards.state.is_empty());
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("mnc_test_0001");
        assert!(matches!(
            collect_shards(&missing),
            Err(crate::SimulationError::Io(_))
        ));
    }
}
