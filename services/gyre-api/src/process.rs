//! Published metadata for the one process this service offers.
//!
//! The shape follows the process-description documents of OGC API
//! Processes far enough for the usual clients: identifier, version,
//! string-typed inputs with defaults, and the three outputs with their
//! media types.

use serde::Serialize;

/// Identifier of the wrapped simulation process.
pub const PROCESS_ID: &str = "mitgcm-baroclinic-gyre";

const PROCESS_TITLE: &str = "MITgcm baroclinic gyre";
const PROCESS_DESCRIPTION: &str = "Runs the MITgcm baroclinic gyre tutorial configuration with \
     caller-supplied time stepping, viscosity and surface forcing, and returns download links \
     to the merged NetCDF results and the captured model output.";
const PROCESS_KEYWORDS: [&str; 4] = ["mitgcm", "ocean model", "baroclinic gyre", "simulation"];

/// Title and description of one process output, shared between the
/// process description and the execute response.
pub struct OutputMeta {
    pub title: &'static str,
    pub description: &'static str,
    pub media_type: &'static str,
}

pub const GRID_OUTPUT: OutputMeta = OutputMeta {
    title: "Model grid",
    description: "Merged NetCDF file with the model grid: cell positions, spacing and bathymetry.",
    media_type: "application/x-netcdf",
};

pub const STATE_OUTPUT: OutputMeta = OutputMeta {
    title: "Model state",
    description: "Merged NetCDF file with the evolving model state: potential temperature, \
         velocities and sea surface height for every output interval.",
    media_type: "application/x-netcdf",
};

pub const STDOUT_OUTPUT: OutputMeta = OutputMeta {
    title: "Model stdout",
    description: "Standard output of the model run, kept for provenance and debugging.",
    media_type: "text/plain",
};

/// Short process listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessSummary {
    pub id: &'static str,
    pub version: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    #[serde(rename = "jobControlOptions")]
    pub job_control_options: [&'static str; 1],
}

/// Full process description with inputs and outputs.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessDescription {
    pub id: &'static str,
    pub version: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub keywords: [&'static str; 4],
    #[serde(rename = "jobControlOptions")]
    pub job_control_options: [&'static str; 1],
    pub inputs: ProcessInputs,
    pub outputs: ProcessOutputs,
}

/// The six request inputs, in the order clients usually pass them.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessInputs {
    #[serde(rename = "endTime")]
    pub end_time: InputDescription,
    #[serde(rename = "deltaT")]
    pub delta_t: InputDescription,
    #[serde(rename = "viscAh")]
    pub visc_ah: InputDescription,
    #[serde(rename = "tauMax")]
    pub tau_max: InputDescription,
    #[serde(rename = "Tmin")]
    pub t_min: InputDescription,
    #[serde(rename = "Tmax")]
    pub t_max: InputDescription,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputDescription {
    pub title: &'static str,
    pub description: &'static str,
    pub schema: InputSchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub default: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutputs {
    pub grid: OutputDescription,
    pub state: OutputDescription,
    pub stdout: OutputDescription,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputDescription {
    pub title: &'static str,
    pub description: &'static str,
    pub schema: OutputSchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputSchema {
    #[serde(rename = "type")]
    pub type_: &'static str,
    #[serde(rename = "contentMediaType")]
    pub content_media_type: &'static str,
}

/// The process listing entry.
pub fn summary() -> ProcessSummary {
    ProcessSummary {
        id: PROCESS_ID,
        version: env!("CARGO_PKG_VERSION"),
        title: PROCESS_TITLE,
        description: PROCESS_DESCRIPTION,
        job_control_options: ["sync-execute"],
    }
}

/// The full process description.
pub fn description() -> ProcessDescription {
    let string_input = |title, description, default| InputDescription {
        title,
        description,
        schema: InputSchema {
            type_: "string",
            default,
        },
    };
    let output = |meta: &OutputMeta| OutputDescription {
        title: meta.title,
        description: meta.description,
        schema: OutputSchema {
            type_: "string",
            content_media_type: meta.media_type,
        },
    };

    ProcessDescription {
        id: PROCESS_ID,
        version: env!("CARGO_PKG_VERSION"),
        title: PROCESS_TITLE,
        description: PROCESS_DESCRIPTION,
        keywords: PROCESS_KEYWORDS,
        job_control_options: ["sync-execute"],
        inputs: ProcessInputs {
            end_time: string_input(
                "End time",
                "Model end time in seconds. The run starts at zero, so this is the simulated \
                 duration.",
                "12000",
            ),
            delta_t: string_input(
                "Time step",
                "Model time step in seconds. The tutorial setup uses 1200 (20 minutes).",
                "1200",
            ),
            visc_ah: string_input(
                "Horizontal viscosity",
                "Laplacian eddy viscosity in m^2/s.",
                "5000",
            ),
            tau_max: string_input(
                "Peak wind stress",
                "Maximum zonal wind stress in N/m^2, reached in the middle of the basin.",
                "0.1",
            ),
            t_min: string_input(
                "Northern restoring temperature",
                "Surface restoring temperature at the northern edge, degrees C.",
                "0.0",
            ),
            t_max: string_input(
                "Southern restoring temperature",
                "Surface restoring temperature at the southern edge, degrees C.",
                "30.0",
            ),
        },
        outputs: ProcessOutputs {
            grid: output(&GRID_OUTPUT),
            state: output(&STATE_OUTPUT),
            stdout: output(&STDOUT_OUTPUT),
        },
    }
}
