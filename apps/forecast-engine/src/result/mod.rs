//! The nested result tree, per-cell failures, and phase assembly.

mod assembler;
mod failure;
mod tree;

pub use assembler::{AssemblyError, AssemblyPlan, assemble};
pub use failure::{FailureKind, TaskFailure};
pub use tree::{
    ModelOutcome, ModelResults, ModelSummary, PartialTree, ResultTree, ResultType, RunSummary,
};
