//! Progress reporting for long row loops
//!
//! Registry dumps run to millions of rows. `RowProgress` logs a line every
//! `interval` rows and, when enabled, ticks an indicatif spinner.

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Template used for row spinners
pub const DEFAULT_SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {pos} rows ({per_sec}) {msg}";

/// Create a spinner progress bar for operations without a known length
///
/// # Arguments
/// * `message` - Optional message to display with the spinner
///
/// # Returns
/// A configured spinner `ProgressBar`
#[must_use]
pub fn create_spinner(message: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(DEFAULT_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }

    if let Some(msg) = message {
        pb.set_message(msg.to_string());
    }

    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Counts rows of one source table
pub struct RowProgress {
    label: String,
    interval: usize,
    count: usize,
    started: Instant,
    bar: Option<ProgressBar>,
}

impl RowProgress {
    /// Create a counter that logs every `interval` rows
    #[must_use]
    pub fn new(label: &str, interval: usize, show_bar: bool) -> Self {
        let bar = show_bar.then(|| create_spinner(Some(label)));
        Self {
            label: label.to_string(),
            interval: interval.max(1),
            count: 0,
            started: Instant::now(),
            bar,
        }
    }

    /// Record one processed row
    pub fn tick(&mut self) {
        self.count += 1;
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
        if self.count % self.interval == 0 {
            log::info!("[{}] {} rows...", self.label, self.count);
        }
    }

    /// Rows seen so far
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Stop the spinner and log the total
    pub fn finish(self) -> usize {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        log::info!(
            "[{}] parsed {} rows in {:?}",
            self.label,
            self.count,
            self.started.elapsed()
        );
        self.count
    }
}
