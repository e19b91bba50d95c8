//! Observability for forecast runs.
//!
//! Structured logging goes through `tracing` directly; this module holds the
//! metric helpers.

mod metrics;

pub use metrics::{
    Phase, record_cell, record_phase_progress, record_phase_report, record_pool_failure,
    record_run, record_run_error, record_scheduler_state, record_task_group, scheduler_state,
};
