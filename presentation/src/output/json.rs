//! JSON report output

use super::formatter::ReportFormatter;
use interview_application::PoolCount;
use interview_domain::{SessionHistoryEntry, SessionSummary, TopicStats};
use serde::Serialize;

pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_summary(&self, summary: &SessionSummary) -> String {
        Self::render(summary)
    }

    fn format_history(&self, history: &[SessionHistoryEntry], topics: &[TopicStats]) -> String {
        Self::render(&serde_json::json!({
            "sessions": history,
            "topics": topics,
        }))
    }

    fn format_pool(&self, counts: &[PoolCount]) -> String {
        Self::render(counts)
    }
}
