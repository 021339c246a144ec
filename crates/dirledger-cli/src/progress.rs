use dirledger_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Spinner for the scan phase; total file count is unknown up front.
pub struct CliReporter {
    bar: ProgressBar,
    skipped: AtomicUsize,
}

impl CliReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        Self {
            bar,
            skipped: AtomicUsize::new(0),
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, base_path: &Path) {
        self.bar
            .set_message(format!("Scanning {}...", base_path.display()));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_file_indexed(&self, files_indexed: usize, _path: &Path) {
        if files_indexed % 64 == 0 {
            self.bar.set_message(format!(
                "Scanning... {} files indexed, {} skipped",
                files_indexed,
                self.skipped.load(Ordering::Relaxed)
            ));
        }
    }

    // The engine already logs the cause; only the tally is shown here.
    fn on_file_skipped(&self, _path: &Path, _error: &io::Error) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    fn on_scan_complete(&self, files_indexed: usize, files_skipped: usize, duration_secs: f64) {
        self.bar.finish_and_clear();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} files indexed, {} skipped in {:.2}s",
            files_indexed, files_skipped, duration_secs
        );
    }
}
