//! Progress indication for transfer operations
//!
//! The engine logs per-item progress through tracing; the spinner gives
//! interactive sessions a liveness signal while a backup or restore
//! runs. Suppressed in quiet and JSON mode.

use super::OutputConfig;

/// Spinner wrapper for indeterminate progress
#[derive(Debug)]
pub struct ProgressSpinner {
    bar: Option<indicatif::ProgressBar>,
}

impl ProgressSpinner {
    /// Create a spinner with a message, unless output config suppresses it
    pub fn start(config: &OutputConfig, message: &str) -> Self {
        let bar = if config.quiet || config.json || config.no_progress {
            None
        } else {
            let bar = indicatif::ProgressBar::new_spinner();
            bar.set_style(
                indicatif::ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .expect("valid template"),
            );
            bar.set_message(message.to_string());
            bar.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(bar)
        };

        Self { bar }
    }

    /// Update the message
    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Finish and clear the spinner
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Check if the spinner is visible
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}
