use std::io;
use std::path::Path;

/// Trait for reporting scan progress.
///
/// The CLI implements it with indicatif; tests use it to count outcomes.
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self, _base_path: &Path) {}
    fn on_file_indexed(&self, _files_indexed: usize, _path: &Path) {}
    fn on_file_skipped(&self, _path: &Path, _error: &io::Error) {}
    fn on_scan_complete(&self, _files_indexed: usize, _files_skipped: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
