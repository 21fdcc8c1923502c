//! Tracking for active and recently completed simulation jobs.
//!
//! Purely observational: the tracker backs the `/executions` endpoint and
//! has no influence on job execution or results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use simulation::RunParameters;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

/// Tracking for execution jobs.
pub struct ExecutionTracker {
    active: Mutex<HashMap<String, ActiveExecution>>,
    completed: Mutex<VecDeque<CompletedExecution>>,
    max_completed: usize,
}

/// A job currently owning the run directory.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveExecution {
    pub id: String,
    pub parameters: RunParameters,
    pub started_at: DateTime<Utc>,
    pub status: String,
}

/// A finished job.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedExecution {
    pub id: String,
    pub parameters: RunParameters,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub success: bool,
    /// Download links of the published results, empty on failure
    pub outputs: Vec<String>,
    pub error_message: Option<String>,
}

/// Response for the /executions endpoint.
#[derive(Debug, Serialize)]
pub struct ExecutionsResponse {
    pub active: Vec<ActiveExecution>,
    pub recent: Vec<CompletedExecution>,
    pub total_completed: usize,
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(HashMap::new()),
            completed: Mutex::new(VecDeque::new()),
            max_completed: 100,
        }
    }

    pub async fn start(&self, id: &str, parameters: RunParameters) {
        let execution = ActiveExecution {
            id: id.to_string(),
            parameters,
            started_at: Utc::now(),
            status: "running".to_string(),
        };
        self.active.lock().await.insert(id.to_string(), execution);
    }

    pub async fn complete(
        &self,
        id: &str,
        success: bool,
        outputs: Vec<String>,
        error_message: Option<String>,
    ) {
        let mut active = self.active.lock().await;
        if let Some(execution) = active.remove(id) {
            let completed_at = Utc::now();
            let duration_ms = (completed_at - execution.started_at).num_milliseconds() as u64;

            let completed = CompletedExecution {
                id: execution.id,
                parameters: execution.parameters,
                started_at: execution.started_at,
                completed_at,
                duration_ms,
                success,
                outputs,
                error_message,
            };

            let mut completed_list = self.completed.lock().await;
            completed_list.push_front(completed);

            // Keep only recent entries
            while completed_list.len() > self.max_completed {
                completed_list.pop_back();
            }
        }
    }

    pub async fn get_status(&self) -> ExecutionsResponse {
        let active = self.active.lock().await;
        let completed = self.completed.lock().await;

        ExecutionsResponse {
            active: active.values().cloned().collect(),
            recent: completed.iter().take(20).cloned().collect(),
            total_completed: completed.len(),
        }
    }
}
