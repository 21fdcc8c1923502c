//! The three surface forcing fields the model reads at startup.
//!
//! Each generator evaluates its analytic profile in f64 over the full grid,
//! land ring included. Narrowing to float32 happens when the field is
//! encoded for disk.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::grid::{DomainGrid, Field};
use crate::Result;

/// File name of the bathymetry grid, as referenced by `bathyFile`.
pub const BATHYMETRY_FILE: &str = "bathy.bin";
/// File name of the zonal wind stress grid, as referenced by `zonalWindFile`.
pub const WIND_STRESS_FILE: &str = "windx_cosy.bin";
/// File name of the restoring temperature grid, as referenced by `thetaClimFile`.
pub const RESTORING_TEMPERATURE_FILE: &str = "SST_relax.bin";

/// Surface forcing amplitudes taken from the job request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceForcing {
    /// Peak zonal wind stress, N/m^2
    pub tau_max: f64,
    /// Restoring temperature at the northern edge, degrees C
    pub t_min: f64,
    /// Restoring temperature at the southern edge, degrees C
    pub t_max: f64,
}

/// Paths of the three grid files written by [`write_forcing_files`].
#[derive(Debug, Clone, PartialEq)]
pub struct ForcingFiles {
    pub bathymetry: PathBuf,
    pub wind_stress: PathBuf,
    pub restoring_temperature: PathBuf,
}

/// Flat-bottomed basin of depth `ho`, closed by a land ring.
///
/// Interior cells are `-ho` (depth is negative down), the outermost row and
/// column on every side are zero. Grids smaller than 3x3 have no interior
/// and come out all land.
pub fn bathymetry(grid: &DomainGrid) -> Field {
    let (ny, nx) = (grid.ny, grid.nx);
    let mut depth = Field::filled(ny, nx, -grid.ho);
    if ny == 0 || nx == 0 {
        return depth;
    }
    for i in 0..nx {
        depth.set(0, i, 0.0);
        depth.set(ny - 1, i, 0.0);
    }
    for j in 0..ny {
        depth.set(j, 0, 0.0);
        depth.set(j, nx - 1, 0.0);
    }
    depth
}

/// Sinusoidal zonal wind stress, one full cosine period over the interior.
///
/// `tau(y) = -tau_max * cos(2 pi (y - yo) / Ly)` with `Ly` the meridional
/// extent of the ocean interior. The profile depends on latitude only, so
/// every column carries the same values: westward at the edges, eastward
/// across the middle of the basin.
pub fn zonal_wind_stress(grid: &DomainGrid, tau_max: f64) -> Field {
    let y = grid.y_coords();
    let ly = grid.interior_span_y();
    Field::from_fn(grid.ny, grid.nx, |j, _| {
        -tau_max * (2.0 * PI * (y[j] - grid.yo) / ly).cos()
    })
}

/// Linear north-south restoring temperature profile.
///
/// `t_max` at the southern edge falling linearly to `t_min` at the northern
/// edge. Because the y samples sit on cell centers, the outermost rows
/// overshoot the endpoints by half a cell's worth of gradient.
pub fn restoring_temperature(grid: &DomainGrid, t_min: f64, t_max: f64) -> Field {
    let y = grid.y_coords();
    let ly = grid.interior_span_y();
    let y_north = grid.y_north();
    Field::from_fn(grid.ny, grid.nx, |j, _| {
        (t_max - t_min) / ly * (y_north - y[j]) + t_min
    })
}

/// Generate all three forcing fields and write them under `out_dir`,
/// replacing any files left over from a previous run.
pub fn write_forcing_files(
    out_dir: &Path,
    grid: &DomainGrid,
    forcing: &SurfaceForcing,
) -> Result<ForcingFiles> {
    let files = ForcingFiles {
        bathymetry: out_dir.join(BATHYMETRY_FILE),
        wind_stress: out_dir.join(WIND_STRESS_FILE),
        restoring_temperature: out_dir.join(RESTORING_TEMPERATURE_FILE),
    };

    info!(path = %files.bathymetry.display(), "Writing bathymetry file");
    bathymetry(grid).write_to(&files.bathymetry)?;

    info!(path = %files.wind_stress.display(), "Writing zonal wind stress file");
    zonal_wind_stress(grid, forcing.tau_max).write_to(&files.wind_stress)?;

    info!(
        path = %files.restoring_temperature.display(),
        "Writing restoring temperature file"
    );
    restoring_temperature(grid, forcing.t_min, forcing.t_max)
        .write_to(&files.restoring_temperature)?;

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    fn tutorial_grid() -> DomainGrid {
        DomainGrid::default()
    }

    #[test]
    fn bathymetry_has_flat_interior_and_land_ring() {
        let grid = tutorial_grid();
        let depth = bathymetry(&grid);
        for j in 0..grid.ny {
            for i in 0..grid.nx {
                let expected = if j == 0 || j == grid.ny - 1 || i == 0 || i == grid.nx - 1 {
                    0.0
                } else {
                    -1800.0
                };
                assert_eq!(depth.get(j, i), expected, "cell ({}, {})", j, i);
            }
        }
    }

    #[test]
    fn bathymetry_of_tiny_grid_is_all_land() {
        let grid = DomainGrid {
            nx: 2,
            ny: 2,
            ..tutorial_grid()
        };
        let depth = bathymetry(&grid);
        assert!(depth.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn wind_stress_is_constant_along_x() {
        let grid = tutorial_grid();
        let tau = zonal_wind_stress(&grid, 0.1);
        for j in [0, 13, 31, 61] {
            let row_value = tau.get(j, 0);
            for i in 1..grid.nx {
                assert_eq!(tau.get(j, i), row_value);
            }
        }
    }

    #[test]
    fn wind_stress_profile_shape() {
        let grid = tutorial_grid();
        let tau_max = 0.1;
        let tau = zonal_wind_stress(&grid, tau_max);
        // Bounded by the requested amplitude
        assert!(tau.values().iter().all(|&v| v.abs() <= tau_max + 1e-12));
        // Westward near the southern wall, eastward across the middle
        assert!(tau.get(1, 1) < 0.0);
        assert!(tau.get(31, 1) > 0.0);
        // Symmetric about the basin's mid-latitude
        for j in 0..grid.ny {
            assert_approx_eq!(tau.get(j, 5), tau.get(grid.ny - 1 - j, 5), 1e-9);
        }
    }

    #[test]
    fn wind_stress_scales_with_amplitude() {
        let grid = tutorial_grid();
        let tau_small = zonal_wind_stress(&grid, 0.1);
        let tau_large = zonal_wind_stress(&grid, 0.2);
        for (&a, &b) in tau_small.values().iter().zip(tau_large.values()) {
            assert_approx_eq!(b, 2.0 * a, 1e-12);
        }
    }

    #[test]
    fn restoring_temperature_falls_northward() {
        let grid = tutorial_grid();
        let sst = restoring_temperature(&grid, 0.0, 30.0);
        // Near the endpoints at the walls; the half-cell shift moves the
        // outermost rows a quarter degree past them.
        assert_approx_eq!(sst.get(0, 1), 30.0, 0.3);
        assert_approx_eq!(sst.get(grid.ny - 1, 1), 0.0, 0.3);
        // Strictly decreasing toward the north
        for j in 1..grid.ny {
            assert!(sst.get(j, 1) < sst.get(j - 1, 1));
        }
        // Midpoint of a linear profile is the mean of the endpoints
        let mid = 0.5 * (sst.get(0, 1) + sst.get(grid.ny - 1, 1));
        let j_mid = grid.ny / 2;
        let observed_mid = 0.5 * (sst.get(j_mid, 1) + sst.get(j_mid - 1, 1));
        assert_approx_eq!(observed_mid, mid, 1e-9);
    }

    #[test]
    fn restoring_temperature_is_constant_along_x() {
        let grid = tutorial_grid();
        let sst = restoring_temperature(&grid, 0.0, 30.0);
        for j in [0, 30, 61] {
            let row_value = sst.get(j, 0);
            for i in 1..grid.nx {
                assert_eq!(sst.get(j, i), row_value);
            }
        }
    }
}
