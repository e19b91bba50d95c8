//! Backtest window planning.
//!
//! Turns one series length, a horizon and a [`BacktestSpec`] into a
//! deterministic, oldest-first sequence of train/test splits:
//! - Disabled: one future window after the last observation
//! - `rolling`: test windows one period apart
//! - `moving`: test windows one horizon apart
//! - `expanding` / `fixed`: growing or constant-length training ranges

mod builder;
mod planner;
mod types;

pub use builder::BacktestSpecBuilder;
pub use planner::{MIN_TRAIN_SIZE, PlanError, plan};
pub use types::{BacktestSpec, SamplePolicy, Window, WindowKind, WindowMethod, WindowPlan};
