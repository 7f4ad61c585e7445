//! Progress display for probe batches
//!
//! Renders scheduler progress snapshots as an indicatif progress bar, one bar
//! per source batch. In quiet mode the bar is disabled and updates are
//! no-ops; the final counts still reach the console through the summary.

use indicatif::{ProgressBar, ProgressStyle};

use crate::app::BatchProgress;

/// Progress bar for one source batch
#[derive(Debug)]
pub struct BatchProgressBar {
    bar: Option<ProgressBar>,
}

impl BatchProgressBar {
    /// Create a bar for a batch of `total` probes; disabled bars render
    /// nothing
    pub fn new(total: usize, enabled: bool) -> Self {
        if !enabled || total == 0 {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "  {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}",
            )
            .expect("progress template is valid")
            .progress_chars("##-"),
        );
        Self { bar: Some(bar) }
    }

    /// Render one progress snapshot
    pub fn update(&self, progress: &BatchProgress) {
        if let Some(bar) = &self.bar {
            bar.set_position(progress.completed as u64);
            bar.set_message(format!(
                "working: {} | broken: {}",
                progress.working, progress.broken
            ));
        }
    }

    /// Finish the bar, leaving the final counts visible
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish();
        }
    }
}
