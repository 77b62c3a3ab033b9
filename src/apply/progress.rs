//! Progress reporting hooks for apply runs

use crate::apply::execute::CherryOutcome;

/// Receives incremental progress while a plan executes
pub trait ProgressCallback {
    /// Free-form status message
    fn on_message(&self, message: &str);

    /// A cherry reached its final state
    fn on_outcome(&self, outcome: &CherryOutcome);
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_message(&self, _message: &str) {}

    fn on_outcome(&self, _outcome: &CherryOutcome) {}
}
