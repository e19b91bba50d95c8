//! Configuration for the fan-out scheduler.

use serde::{Deserialize, Serialize};

/// Configuration for the worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of pool workers (1 = run in the coordinating thread).
    pub worker_count: usize,

    /// Whether to log per-group progress at debug level.
    pub track_progress: bool,
}

impl SchedulerConfig {
    /// Configuration with `worker_count` workers.
    #[must_use]
    pub const fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count,
            track_progress: true,
        }
    }

    /// Whether a dedicated pool is created.
    #[must_use]
    pub const fn uses_pool(&self) -> bool {
        self.worker_count > 1
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::with_workers(1)
    }
}
