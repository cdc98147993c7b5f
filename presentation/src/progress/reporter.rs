//! Progress reporting for background grading

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use interview_application::ProcessingProgress;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Counts {
    running: usize,
    done: usize,
    failed: usize,
}

/// Spinner showing background grading activity
pub struct ProgressReporter {
    bar: ProgressBar,
    counts: Mutex<Counts>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new_spinner())
    }

    /// Reporter that counts tasks without drawing until [`show`](Self::show)
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.set_style(Self::spinner_style());
        bar.set_prefix("Grading");
        Self {
            bar,
            counts: Mutex::new(Counts::default()),
        }
    }

    /// Start drawing on stderr
    pub fn show(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(counts) = self.counts.lock() {
            self.refresh(&counts);
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn refresh(&self, counts: &Counts) {
        let mut message = format!("{} running, {} done", counts.running, counts.done);
        if counts.failed > 0 {
            message.push_str(&format!(", {} failed", counts.failed));
        }
        self.bar.set_message(message);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingProgress for ProgressReporter {
    fn on_task_start(&self, _label: &str) {
        if let Ok(mut counts) = self.counts.lock() {
            if counts.running == 0 {
                self.bar.enable_steady_tick(Duration::from_millis(120));
            }
            counts.running += 1;
            self.refresh(&counts);
        }
    }

    fn on_task_complete(&self, _label: &str, success: bool) {
        if let Ok(mut counts) = self.counts.lock() {
            counts.running = counts.running.saturating_sub(1);
            if success {
                counts.done += 1;
            } else {
                counts.failed += 1;
            }
            self.refresh(&counts);
        }
    }

    fn on_drained(&self) {
        let message = match self.counts.lock() {
            Ok(counts) if counts.failed > 0 => {
                format!("{} ({} failed)", "finished".yellow(), counts.failed)
            }
            _ => "finished".green().to_string(),
        };
        self.bar.finish_with_message(message);
    }
}

/// Line-per-task progress for non-interactive output
pub struct SimpleProgress;

impl ProcessingProgress for SimpleProgress {
    fn on_task_start(&self, label: &str) {
        eprintln!("{} {}", "->".cyan(), label);
    }

    fn on_task_complete(&self, label: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), label);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), label);
        }
    }
}
