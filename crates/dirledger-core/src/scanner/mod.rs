pub mod metadata;
pub mod walk;

use std::io;
use std::path::PathBuf;

pub use metadata::{format_timestamp, read_file_times, FileTimes};
pub use walk::{FileWalker, IgnoreSet};

/// A path that could not be indexed, with the reason.
#[derive(Debug)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub error: io::Error,
}

impl SkippedEntry {
    pub fn new(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self {
            path: path.into(),
            error,
        }
    }
}
