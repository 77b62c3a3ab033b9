//! Cherry-pick application engine
//!
//! Two-phase pattern:
//! 1. Plan - classify cherries into `ApplyPlan` steps (pure, testable)
//! 2. Execute - perform picks and branch bookkeeping (effectful)

mod execute;
mod plan;
mod progress;

pub use execute::{
    ApplyOptions, ApplySummary, CherryOutcome, CherryStatus, DEFAULT_TEMP_BRANCH, WorkingBranch,
    execute_apply, prepare_working_branch,
};
pub use plan::{ApplyPlan, ApplyStep, create_apply_plan};
pub use progress::{NoopProgress, ProgressCallback};
