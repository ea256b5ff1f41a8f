//! Terminal progress reporting

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over a known number of steps
///
/// A tracker created with [`ProgressTracker::hidden`] accepts the same calls
/// and draws nothing, so callers never branch on whether progress is shown.
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message(description.to_string());

        ProgressTracker { bar }
    }

    /// Tracker that never draws
    pub fn hidden(total: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total);
        ProgressTracker { bar }
    }

    /// Visible or hidden tracker depending on a flag
    pub fn maybe(show: bool, total: u64, description: &str) -> Self {
        if show {
            Self::new(total, description)
        } else {
            Self::hidden(total)
        }
    }

    pub fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Completed");
    }

    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }
}
