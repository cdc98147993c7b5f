//! Report formatter trait

use interview_application::PoolCount;
use interview_domain::{SessionHistoryEntry, SessionSummary, TopicStats};

/// Renders interview reports for display
pub trait ReportFormatter {
    /// Full summary of one session
    fn format_summary(&self, summary: &SessionSummary) -> String;

    /// Session list plus per-topic averages
    fn format_history(&self, history: &[SessionHistoryEntry], topics: &[TopicStats]) -> String;

    /// Question bank inventory
    fn format_pool(&self, counts: &[PoolCount]) -> String;
}
