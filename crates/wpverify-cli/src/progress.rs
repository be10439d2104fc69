//! Progress spinner for audits.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::time::Duration;
use wpverify_core::ScanObserver;

/// CLI spinner implementing `ScanObserver`.
///
/// Shows the component being checked and the number of files compared so
/// far. Cleared on drop.
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    /// Creates and starts a spinner on stderr.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} ({pos} files)")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScanProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ScanObserver for ScanProgress {
    fn on_component_start(&mut self, name: &str) {
        self.bar.set_position(0);
        self.bar.set_message(format!("Checking {name}"));
    }

    fn on_file_checked(&mut self, _relative: &str) {
        self.bar.inc(1);
    }

    fn on_component_complete(&mut self, _name: &str) {}
}
