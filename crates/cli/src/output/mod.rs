//! Output formatting utilities
//!
//! Formatters for CLI output in human-readable and JSON formats, plus
//! progress indication for long-running transfers.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::ProgressSpinner;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress indication
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}
