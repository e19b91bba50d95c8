//! Two-phase execution: parallel fan-out of task groups over a bounded
//! worker pool, then sequential execution of self-parallelizing models.

mod config;
mod error;
mod executor;
mod progress;
mod sequential;
mod state;
mod task;
mod types;

pub use config::SchedulerConfig;
pub use error::SchedulerError;
pub use executor::{FanOutScheduler, available_workers};
pub use progress::{PhaseProgress, PhaseReport};
pub use sequential::ExclusionRunner;
pub use state::SchedulerState;
pub use types::{RunContext, TaskGroupResult};
