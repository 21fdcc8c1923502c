//! Shared application state for the gyre API.

use simulation::{GyreProcessor, RunConfig};

use crate::process;
use crate::tracker::ExecutionTracker;

/// Shared application state.
pub struct AppState {
    /// Simulation pipeline bound to the configured run directory.
    pub processor: GyreProcessor,

    /// Active and recently completed jobs.
    pub tracker: ExecutionTracker,
}

impl AppState {
    /// Create application state from a validated run configuration.
    pub fn new(config: RunConfig) -> Self {
        Self {
            processor: GyreProcessor::with_gluemncbig(config, process::PROCESS_ID),
            tracker: ExecutionTracker::new(),
        }
    }
}
