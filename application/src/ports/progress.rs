//! Progress notification port
//!
//! Defines the interface for reporting background processing progress.

/// Callback for progress updates while background tasks run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, log lines, etc.)
pub trait ProcessingProgress: Send + Sync {
    /// Called when a task starts running
    fn on_task_start(&self, label: &str);

    /// Called when a task finishes
    fn on_task_complete(&self, label: &str, success: bool);

    /// Called once the queue has been drained
    fn on_drained(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProcessingProgress for NoProgress {
    fn on_task_start(&self, _label: &str) {}
    fn on_task_complete(&self, _label: &str, _success: bool) {}
}
