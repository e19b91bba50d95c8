//! Error types for the fan-out scheduler.

use thiserror::Error;

use crate::data::SplitError;

/// Errors that abort a scheduler run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The worker pool could not be created.
    #[error("Failed to create worker pool of {requested} workers ({available} available): {message}")]
    PoolCreation {
        /// Workers requested.
        requested: usize,
        /// Parallelism available on this host.
        available: usize,
        /// Detail.
        message: String,
    },

    /// A series could not be projected out of the input.
    #[error("Series split failed: {0}")]
    Split(#[from] SplitError),
}
