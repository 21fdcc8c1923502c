//! Typed run parameters parsed from job request inputs.
//!
//! Request inputs arrive as optional strings, matching the published
//! process schema. Parsing applies the tutorial defaults for anything
//! absent and rejects anything that is present but not numeric.

use namelist::NamelistPatch;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use forcing::SurfaceForcing;

/// Raw execute-request inputs.
///
/// All six fields are optional; unknown fields are ignored so clients can
/// carry extra metadata without breaking the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecuteInputs {
    /// Model end time in seconds
    #[serde(default, rename = "endTime")]
    pub end_time: Option<String>,
    /// Time step in seconds
    #[serde(default, rename = "deltaT")]
    pub delta_t: Option<String>,
    /// Horizontal viscosity in m^2/s
    #[serde(default, rename = "viscAh")]
    pub visc_ah: Option<String>,
    /// Peak zonal wind stress in N/m^2
    #[serde(default, rename = "tauMax")]
    pub tau_max: Option<String>,
    /// Restoring temperature at the northern edge, degrees C
    #[serde(default, rename = "Tmin")]
    pub t_min: Option<String>,
    /// Restoring temperature at the southern edge, degrees C
    #[serde(default, rename = "Tmax")]
    pub t_max: Option<String>,
}

/// Validated parameters for one model run.
///
/// Serializes under the request vocabulary so tracked jobs echo the
/// names clients sent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunParameters {
    #[serde(rename = "endTime")]
    pub end_time: i64,
    #[serde(rename = "deltaT")]
    pub delta_t: i64,
    #[serde(rename = "viscAh")]
    pub visc_ah: i64,
    #[serde(rename = "tauMax")]
    pub tau_max: f64,
    #[serde(rename = "Tmin")]
    pub t_min: f64,
    #[serde(rename = "Tmax")]
    pub t_max: f64,
}

impl Default for RunParameters {
    /// The tutorial's ten-step verification run.
    fn default() -> Self {
        Self {
            end_time: 12_000,
            delta_t: 1_200,
            visc_ah: 5_000,
            tau_max: 0.1,
            t_min: 0.0,
            t_max: 30.0,
        }
    }
}

impl RunParameters {
    /// Parse request inputs, falling back to the defaults for absent
    /// fields. Returns [`SimulationError::InvalidParameter`] naming the
    /// offending field otherwise.
    pub fn from_inputs(inputs: &ExecuteInputs) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            end_time: parse_int("endTime", inputs.end_time.as_deref())?
                .unwrap_or(defaults.end_time),
            delta_t: parse_int("deltaT", inputs.delta_t.as_deref())?.unwrap_or(defaults.delta_t),
            visc_ah: parse_int("viscAh", inputs.visc_ah.as_deref())?.unwrap_or(defaults.visc_ah),
            tau_max: parse_float("tauMax", inputs.tau_max.as_deref())?
                .unwrap_or(defaults.tau_max),
            t_min: parse_float("Tmin", inputs.t_min.as_deref())?.unwrap_or(defaults.t_min),
            t_max: parse_float("Tmax", inputs.t_max.as_deref())?.unwrap_or(defaults.t_max),
        })
    }

    /// Namelist overrides for the patched `data` file.
    ///
    /// Values carry the trailing-dot Fortran float literal form the
    /// model's namelist reader expects.
    pub fn namelist_patches(&self) -> Vec<NamelistPatch> {
        vec![
            NamelistPatch::new("endTime", format!("{}.", self.end_time)),
            NamelistPatch::new("deltaT", format!("{}.", self.delta_t)),
            NamelistPatch::new("viscAh", format!("{}.", self.visc_ah)),
        ]
    }

    /// The surface forcing amplitudes fed to the grid generators.
    pub fn surface_forcing(&self) -> SurfaceForcing {
        SurfaceForcing {
            tau_max: self.tau_max,
            t_min: self.t_min,
            t_max: self.t_max,
        }
    }
}

fn parse_int(name: &'static str, raw: Option<&str>) -> Result<Option<i64>> {
    match raw {
        None => Ok(None),
        Some(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SimulationError::InvalidParameter {
                name,
                value: text.to_string(),
            }),
    }
}

fn parse_float(name: &'static str, raw: Option<&str>) -> Result<Option<f64>> {
    match raw {
        None => Ok(None),
        Some(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SimulationError::InvalidParameter {
                name,
                value: text.to_string(),
            }),
    }
}
