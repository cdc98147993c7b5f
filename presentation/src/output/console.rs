//! Console output for interview reports

use super::formatter::ReportFormatter;
use colored::Colorize;
use interview_application::{PoolCount, QuestionPrompt};
use interview_domain::{SessionHistoryEntry, SessionStatus, SessionSummary, TopicStats};

/// Formats reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One narrated question as shown during an interview
    pub fn format_question(prompt: &QuestionPrompt) -> String {
        let mut output = String::new();
        if let Some(prefix) = &prompt.prefix {
            output.push_str(&format!("{}\n\n", prefix.italic()));
        }
        output.push_str(&format!(
            "{} {}\n",
            format!("[{}/{}]", prompt.index + 1, prompt.total).cyan().bold(),
            format!("({})", prompt.question.topic).dimmed()
        ));
        output.push_str(&format!("{}\n", prompt.question.text.bold()));
        output
    }

    pub fn format_summary(summary: &SessionSummary) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Interview Summary"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n{} {} / {}\n",
            "Session:".cyan().bold(),
            summary.session_id,
            "Topic:".cyan().bold(),
            summary.topic,
            summary.difficulty
        ));

        match summary.average_score() {
            Some(avg) => output.push_str(&format!(
                "{} {}\n",
                "Average:".cyan().bold(),
                Self::score_label(avg.round() as u8)
            )),
            None => output.push_str(&format!("{} {}\n", "Average:".cyan().bold(), "pending".yellow())),
        }
        if summary.pending_count() > 0 {
            output.push_str(&format!(
                "{}\n",
                format!("{} answer(s) still being graded", summary.pending_count()).yellow()
            ));
        }

        for (i, answer) in summary.answers.iter().enumerate() {
            output.push_str(&Self::section_header(&format!(
                "Q{}. {} ({})",
                i + 1,
                answer.question_text,
                answer.topic
            )));
            output.push_str(&format!("{} {}\n", "Your answer:".bold(), answer.transcript));
            match answer.score {
                Some(score) => output.push_str(&format!("{} {}\n", "Score:".bold(), Self::score_label(score))),
                None => output.push_str(&format!("{} {}\n", "Score:".bold(), "pending".yellow())),
            }
            if !answer.matched_keywords.is_empty() {
                output.push_str(&format!(
                    "{} {}\n",
                    "Keywords:".bold(),
                    answer.matched_keywords.join(", ")
                ));
            }
            if !answer.feedback.is_empty() {
                output.push_str(&format!("\n{}\n", Self::indent(&answer.feedback, "  ")));
            }
            output.push_str(&format!(
                "\n{}\n{}\n",
                "Reference:".dimmed(),
                Self::indent(&answer.reference_answer, "  ").dimmed()
            ));
        }

        if let Some(feedback) = &summary.aggregate_feedback {
            output.push_str(&Self::section_header("Overall Feedback"));
            output.push_str(&format!("{}\n", feedback));
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_history(history: &[SessionHistoryEntry], topics: &[TopicStats]) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Interview History"));
        output.push('\n');

        if history.is_empty() {
            output.push_str("No sessions yet.\n");
        }
        for entry in history {
            let status = match entry.status {
                SessionStatus::Completed => "completed".green(),
                SessionStatus::InProgress => "in progress".yellow(),
            };
            let average = entry
                .average_score
                .map(|avg| format!("{:.0}", avg))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "{}  {:<20} {:<7} {}/{} answered  avg {:>3}  {}{}\n",
                entry.started_at.format("%Y-%m-%d %H:%M"),
                entry.topic.as_str(),
                entry.difficulty.as_str(),
                entry.answered_count,
                entry.question_count,
                average,
                status,
                if entry.has_aggregate_feedback { "" } else { "  (no overall feedback)" }
            ));
            output.push_str(&format!("  {}\n", entry.session_id.to_string().dimmed()));
        }

        if !topics.is_empty() {
            output.push_str(&Self::section_header("By Topic"));
            for stats in topics {
                output.push_str(&format!(
                    "  {:<28} {:>3} graded  avg {:.1}\n",
                    stats.topic, stats.answers_count, stats.average_score
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_pool(counts: &[PoolCount]) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header("Question Bank"));
        for count in counts {
            output.push_str(&format!(
                "  {:<28} {:<7} {:>3}\n",
                count.topic,
                count.difficulty.as_str(),
                count.count
            ));
        }
        let total: usize = counts.iter().map(|c| c.count).sum();
        output.push_str(&format!("  {:<36} {:>3}\n", "Total".bold(), total));
        output
    }

    fn score_label(score: u8) -> String {
        let text = format!("{}/100", score);
        match score {
            75..=100 => text.green().bold().to_string(),
            50..=74 => text.yellow().bold().to_string(),
            _ => text.red().bold().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format_summary(&self, summary: &SessionSummary) -> String {
        Self::format_summary(summary)
    }

    fn format_history(&self, history: &[SessionHistoryEntry], topics: &[TopicStats]) -> String {
        Self::format_history(history, topics)
    }

    fn format_pool(&self, counts: &[PoolCount]) -> String {
        Self::format_pool(counts)
    }
}
