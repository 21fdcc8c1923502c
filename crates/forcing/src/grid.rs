//! Model domain geometry and the dense grid container.
//!
//! The horizontal grid follows the tutorial convention: `nx` by `ny` cells
//! on a spherical-polar grid whose outermost cells form a closed land ring,
//! so the ocean interior spans `(nx - 2) * dx` degrees of longitude and
//! `(ny - 2) * dy` degrees of latitude.

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{ForcingError, Result};

/// Horizontal grid parameters for the model domain.
///
/// The defaults reproduce the tutorial setup: a 60x60-cell ocean basin at
/// one-degree resolution starting at 15N, 1800 m deep, wrapped in a
/// one-cell land ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainGrid {
    /// Basin depth in meters (positive)
    #[serde(default = "default_ho")]
    pub ho: f64,
    /// Grid cells in x, land ring included
    #[serde(default = "default_nx")]
    pub nx: usize,
    /// Grid cells in y, land ring included
    #[serde(default = "default_ny")]
    pub ny: usize,
    /// Longitude of the ocean's western edge, degrees
    #[serde(default = "default_xo")]
    pub xo: f64,
    /// Latitude of the ocean's southern edge, degrees
    #[serde(default = "default_yo")]
    pub yo: f64,
    /// Cell size in x, degrees
    #[serde(default = "default_dx")]
    pub dx: f64,
    /// Cell size in y, degrees
    #[serde(default = "default_dy")]
    pub dy: f64,
}

fn default_ho() -> f64 {
    1800.0
}

fn default_nx() -> usize {
    62
}

fn default_ny() -> usize {
    62
}

fn default_xo() -> f64 {
    0.0
}

fn default_yo() -> f64 {
    15.0
}

fn default_dx() -> f64 {
    1.0
}

fn default_dy() -> f64 {
    1.0
}

impl Default for DomainGrid {
    fn default() -> Self {
        Self {
            ho: default_ho(),
            nx: default_nx(),
            ny: default_ny(),
            xo: default_xo(),
            yo: default_yo(),
            dx: default_dx(),
            dy: default_dy(),
        }
    }
}

impl DomainGrid {
    /// Longitude of the ocean's eastern edge.
    pub fn x_east(&self) -> f64 {
        self.xo + (self.nx as f64 - 2.0) * self.dx
    }

    /// Latitude of the ocean's northern edge.
    pub fn y_north(&self) -> f64 {
        self.yo + (self.ny as f64 - 2.0) * self.dy
    }

    /// Meridional extent of the ocean interior, degrees.
    pub fn interior_span_y(&self) -> f64 {
        (self.ny as f64 - 2.0) * self.dy
    }

    /// Coordinate samples along x, one per cell. The first sample sits one
    /// cell west of the ocean edge, inside the land ring.
    pub fn x_coords(&self) -> Vec<f64> {
        linspace(self.xo - self.dx, self.x_east(), self.nx)
    }

    /// Coordinate samples along y, one per cell, shifted half a cell north
    /// so they fall on cell centers.
    pub fn y_coords(&self) -> Vec<f64> {
        linspace(self.yo - self.dy, self.y_north(), self.ny)
            .into_iter()
            .map(|y| y + self.dy / 2.0)
            .collect()
    }
}

/// `n` evenly spaced samples from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|k| start + k as f64 * step).collect()
        }
    }
}

/// A dense 2-D scalar field stored row-major, row 0 at the southern edge.
///
/// Values are held as f64 and narrowed to f32 only at the encoding
/// boundary, so generator arithmetic keeps full precision.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    ny: usize,
    nx: usize,
    values: Vec<f64>,
}

impl Field {
    /// Create a field with every cell set to `value`.
    pub fn filled(ny: usize, nx: usize, value: f64) -> Self {
        Self {
            ny,
            nx,
            values: vec![value; ny * nx],
        }
    }

    /// Create a field by evaluating `f(j, i)` at every cell, row-major.
    pub fn from_fn(ny: usize, nx: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(ny * nx);
        for j in 0..ny {
            for i in 0..nx {
                values.push(f(j, i));
            }
        }
        Self { ny, nx, values }
    }

    /// Rows in the field.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Columns in the field.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Value at row `j`, column `i`.
    pub fn get(&self, j: usize, i: usize) -> f64 {
        self.values[j * self.nx + i]
    }

    /// Set the value at row `j`, column `i`.
    pub fn set(&mut self, j: usize, i: usize, value: f64) {
        self.values[j * self.nx + i] = value;
    }

    /// Flat row-major view of the values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Encode as headerless big-endian float32, row-major.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.values.len() * 4];
        for (chunk, value) in buf.chunks_exact_mut(4).zip(&self.values) {
            BigEndian::write_f32(chunk, *value as f32);
        }
        buf
    }

    /// Write the encoded field to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_be_bytes()).map_err(|source| ForcingError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
