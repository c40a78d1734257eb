//! Output formatting utilities
//!
//! Formatters for human-readable and JSON output, plus spinners for
//! operations that may take a while.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::Spinner;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress spinners
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}

impl OutputConfig {
    /// Whether spinners may be drawn
    pub fn progress_enabled(&self) -> bool {
        !(self.quiet || self.json || self.no_progress)
    }
}
