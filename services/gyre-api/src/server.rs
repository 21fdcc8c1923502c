//! HTTP server for the gyre API.
//!
//! Provides endpoints for:
//! - `GET /` - Landing document
//! - `GET /health` - Health check
//! - `GET /processes` - List the offered processes
//! - `GET /processes/:process_id` - Full process description
//! - `POST /processes/:process_id/execution` - Run a simulation job
//! - `GET /executions` - Get active/recent jobs
//! - `GET /downloads/:filename` - Serve a published result file

use axum::{
    extract::{Extension, Json, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use simulation::{ExecuteInputs, ExecutionArtifacts, RunParameters, SimulationError};

use crate::process;
use crate::state::AppState;
use crate::tracker::ExecutionsResponse;

/// Fixed message clients scrape from successful responses.
const RESULT_MESSAGE: &str = "Job finished, here are the links to your results.";

/// Request body for the execution endpoint.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    /// Optional overrides for the model parameters
    #[serde(default)]
    pub inputs: ExecuteInputs,
}

/// Response body for a completed job.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub outputs: ExecuteOutputs,
}

/// The message and the three download links.
#[derive(Debug, Serialize)]
pub struct ExecuteOutputs {
    pub message: String,
    pub grid: OutputLink,
    pub state: OutputLink,
    pub stdout: OutputLink,
}

/// One download link with its display metadata.
#[derive(Debug, Serialize)]
pub struct OutputLink {
    pub title: String,
    pub description: String,
    pub href: String,
}

impl From<ExecutionArtifacts> for ExecuteResponse {
    fn from(artifacts: ExecutionArtifacts) -> Self {
        let link = |meta: &process::OutputMeta, href: String| OutputLink {
            title: meta.title.to_string(),
            description: meta.description.to_string(),
            href,
        };
        Self {
            outputs: ExecuteOutputs {
                message: RESULT_MESSAGE.to_string(),
                grid: link(&process::GRID_OUTPUT, artifacts.grid.href),
                state: link(&process::STATE_OUTPUT, artifacts.state.href),
                stdout: link(&process::STDOUT_OUTPUT, artifacts.stdout.href),
            },
        }
    }
}

/// Error body for every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Response for the /processes listing.
#[derive(Debug, Serialize)]
pub struct ProcessList {
    pub processes: Vec<process::ProcessSummary>,
}

/// Landing document.
#[derive(Debug, Serialize)]
pub struct LandingPage {
    pub title: &'static str,
    pub description: &'static str,
    pub links: Vec<LandingLink>,
}

#[derive(Debug, Serialize)]
pub struct LandingLink {
    pub rel: &'static str,
    pub href: &'static str,
    pub title: &'static str,
}

fn landing_page() -> LandingPage {
    LandingPage {
        title: "MITgcm baroclinic gyre API",
        description: "Runs the wrapped ocean-model tutorial and serves the merged results.",
        links: vec![
            LandingLink {
                rel: "self",
                href: "/",
                title: "This document",
            },
            LandingLink {
                rel: "processes",
                href: "/processes",
                title: "The offered processes",
            },
            LandingLink {
                rel: "executions",
                href: "/executions",
                title: "Active and recent jobs",
            },
            LandingLink {
                rel: "health",
                href: "/health",
                title: "Service health",
            },
        ],
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn unknown_process(process_id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("No such process: {process_id}"),
    )
}

/// HTTP status for a failed pipeline run.
fn error_status(error: &SimulationError) -> StatusCode {
    match error {
        SimulationError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Media type a result file is served under.
fn content_type_for(filename: &str) -> &'static str {
    if filename.ends_with(".nc") {
        "application/x-netcdf"
    } else if filename.ends_with(".txt") {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}

/// GET / - Landing document
pub async fn landing_handler() -> Json<LandingPage> {
    Json(landing_page())
}

/// GET /health - Health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "gyre-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /processes - List the offered processes
pub async fn list_processes_handler() -> Json<ProcessList> {
    Json(ProcessList {
        processes: vec![process::summary()],
    })
}

/// GET /processes/:process_id - Full process description
pub async fn describe_process_handler(Path(process_id): Path<String>) -> Response {
    if process_id != process::PROCESS_ID {
        return unknown_process(&process_id);
    }
    Json(process::description()).into_response()
}

/// POST /processes/:process_id/execution - Run a simulation job
///
/// Synchronous: the response is sent after the model has finished and the
/// results are merged and published.
pub async fn execute_process_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(process_id): Path<String>,
    Json(request): Json<ExecuteRequest>,
) -> Response {
    if process_id != process::PROCESS_ID {
        return unknown_process(&process_id);
    }

    let params = match RunParameters::from_inputs(&request.inputs) {
        Ok(params) => params,
        Err(e) => {
            warn!(error = %e, "Rejecting execute request");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let job_id = Uuid::new_v4().to_string();

    info!(job_id = %job_id, ?params, "Received execute request");

    state.tracker.start(&job_id, params).await;

    // The pipeline blocks on the model subprocess
    let worker = Arc::clone(&state);
    let worker_job = job_id.clone();
    let result =
        tokio::task::spawn_blocking(move || worker.processor.execute(&worker_job, &params)).await;

    match result {
        Ok(Ok(artifacts)) => {
            let hrefs = vec![
                artifacts.grid.href.clone(),
                artifacts.state.href.clone(),
                artifacts.stdout.href.clone(),
            ];

            state.tracker.complete(&job_id, true, hrefs, None).await;

            (StatusCode::OK, Json(ExecuteResponse::from(artifacts))).into_response()
        }
        Ok(Err(e)) => {
            error!(job_id = %job_id, error = %e, "Simulation job failed");

            state
                .tracker
                .complete(&job_id, false, vec![], Some(e.to_string()))
                .await;

            error_response(error_status(&e), e.to_string())
        }
        Err(e) => {
            error!(job_id = %job_id, error = %e, "Simulation job panicked");

            state
                .tracker
                .complete(&job_id, false, vec![], Some(e.to_string()))
                .await;

            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Simulation job failed unexpectedly",
            )
        }
    }
}

/// GET /executions - Get active/recent jobs
pub async fn executions_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<ExecutionsResponse> {
    let status = state.tracker.get_status().await;
    Json(status)
}

/// GET /downloads/:filename - Serve a published result file
pub async fn download_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    // The download directory is flat; anything that could climb out of
    // it is treated as a miss
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return error_response(StatusCode::NOT_FOUND, format!("No such file: {filename}"));
    }

    let path = state.processor.config().download_dir.join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (
                    header::CONTENT_TYPE,
                    content_type_for(&filename).to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            warn!(filename = %filename, error = %e, "Requested download is not available");
            error_response(StatusCode::NOT_FOUND, format!("No such file: {filename}"))
        }
    }
}

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(landing_handler))
        .route("/health", get(health_handler))
        .route("/processes", get(list_processes_handler))
        .route("/processes/:process_id", get(describe_process_handler))
        .route(
            "/processes/:process_id/execution",
            post(execute_process_handler),
        )
        .route("/executions", get(executions_handler))
        .route("/downloads/:filename", get(download_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server.
pub async fn start_server(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(%addr, "Starting gyre API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
