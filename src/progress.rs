//! Progress display for source syncs

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Spinner shown on stderr while sources are synced
///
/// Draws nothing when stderr is not a terminal.
pub struct SyncProgress {
    spinner: ProgressBar,
}

impl SyncProgress {
    pub fn new(message: impl Into<String>) -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");

        let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        spinner.set_style(style);
        spinner.set_message(message.into());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    /// Show which source is being synced
    pub fn update(&self, label: &str, current: usize, total: usize) {
        self.spinner.set_message(format!("({current}/{total}) Syncing {label}"));
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for SyncProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.abandon();
        }
    }
}
