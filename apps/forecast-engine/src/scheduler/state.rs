//! Lifecycle states of the fan-out scheduler.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scheduler lifecycle.
///
/// `Idle → PoolStarting → Running → Draining → PoolStopped`. A failed pool
/// start returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// No run in progress.
    #[default]
    Idle,
    /// Creating the worker pool.
    PoolStarting,
    /// Task groups are executing.
    Running,
    /// Waiting for in-flight groups to finish.
    Draining,
    /// Pool threads joined; results available.
    PoolStopped,
}

impl SchedulerState {
    /// Stable snake_case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PoolStarting => "pool_starting",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::PoolStopped => "pool_stopped",
        }
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
