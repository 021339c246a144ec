use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::hasher;
use crate::progress::ProgressReporter;
use crate::scanner::{read_file_times, FileWalker, IgnoreSet, SkippedEntry};
use crate::storage::models::NewFileEntry;
use crate::storage::Database;
use rayon::prelude::*;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Entries committed per store transaction.
const WRITE_BATCH_SIZE: usize = 500;
/// Fingerprinted entries allowed in flight ahead of the writer.
const CHANNEL_CAPACITY: usize = 1024;

/// Drives one full-tree indexing operation into a new scan run.
pub struct ScanEngine<'a> {
    db: &'a Database,
    ignore: IgnoreSet,
    excluded: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct ScanResult {
    pub run_id: i64,
    pub base_path: PathBuf,
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexCounts {
    pub indexed: usize,
    pub skipped: usize,
}

impl<'a> ScanEngine<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            ignore: IgnoreSet::default(),
            excluded: Vec::new(),
        }
    }

    /// Apply ignore patterns and keep the configured store file out of the index.
    pub fn with_config(self, config: &AppConfig) -> Self {
        self.with_ignore_patterns(&config.ignore_patterns)
            .with_store_path(Path::new(&config.db_path))
    }

    pub fn with_ignore_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.ignore = IgnoreSet::new(patterns);
        self
    }

    /// Never index the store file or its SQLite side files.
    pub fn with_store_path(mut self, db_path: &Path) -> Self {
        let db_path = resolve_base_path(db_path);
        for suffix in ["-wal", "-shm", "-journal"] {
            let mut sibling = OsString::from(db_path.as_os_str());
            sibling.push(suffix);
            self.excluded.push(PathBuf::from(sibling));
        }
        self.excluded.push(db_path);
        self
    }

    /// Index every regular file under `base_path` into a new run.
    ///
    /// Fails with [`Error::PathNotFound`] before touching the store if the
    /// path does not exist. Files that cannot be read are reported and left
    /// out; the run is kept as-is.
    pub fn scan(
        &self,
        run_identifier: &str,
        drive_name: &str,
        base_path: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<ScanResult> {
        if !base_path.exists() {
            return Err(Error::PathNotFound(base_path.to_path_buf()));
        }
        let base = fs::canonicalize(base_path)?;
        let base_str = base.to_string_lossy().into_owned();

        info!(
            "Scanning {} as run '{}' on drive '{}'",
            base_str, run_identifier, drive_name
        );
        reporter.on_scan_start(&base);
        let start = Instant::now();

        let run_id = self.db.create_run(run_identifier, drive_name, &base_str)?;

        let walker = FileWalker::new(&base)
            .with_ignore(self.ignore.clone())
            .with_excluded(self.excluded.clone());
        let counts = self.index_paths(run_id, &base, walker, reporter)?;

        let duration = start.elapsed();
        reporter.on_scan_complete(counts.indexed, counts.skipped, duration.as_secs_f64());
        info!(
            "Run {} complete in {:.2}s: {} files indexed, {} skipped",
            run_id,
            duration.as_secs_f64(),
            counts.indexed,
            counts.skipped,
        );

        Ok(ScanResult {
            run_id,
            base_path: base,
            files_indexed: counts.indexed,
            files_skipped: counts.skipped,
            duration,
        })
    }

    /// Fingerprint `paths` in parallel and write one entry per readable file
    /// into `run_id`. A single thread owns the store connection; the rayon
    /// pool only reads files.
    pub fn index_paths<I>(
        &self,
        run_id: i64,
        base: &Path,
        paths: I,
        reporter: &dyn ProgressReporter,
    ) -> Result<IndexCounts>
    where
        I: Iterator<Item = std::result::Result<PathBuf, SkippedEntry>> + Send,
    {
        let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);

        thread::scope(|scope| -> Result<IndexCounts> {
            scope.spawn(move || {
                // A send only fails once the writer has bailed out; stop then.
                let _ = paths.par_bridge().try_for_each_with(tx, |tx, item| {
                    tx.send(item.and_then(|path| index_file(base, &path)))
                });
            });

            let mut counts = IndexCounts::default();
            let mut batch: Vec<NewFileEntry> = Vec::with_capacity(WRITE_BATCH_SIZE);

            for outcome in rx {
                match outcome {
                    Ok(entry) => {
                        reporter.on_file_indexed(
                            counts.indexed + batch.len() + 1,
                            Path::new(&entry.full_path),
                        );
                        batch.push(entry);
                        if batch.len() >= WRITE_BATCH_SIZE {
                            counts.indexed += self.flush(run_id, &mut batch)?;
                        }
                    }
                    Err(skipped) => {
                        warn!(
                            "Error processing {}: {}",
                            skipped.path.display(),
                            skipped.error
                        );
                        reporter.on_file_skipped(&skipped.path, &skipped.error);
                        counts.skipped += 1;
                    }
                }
            }
            counts.indexed += self.flush(run_id, &mut batch)?;

            Ok(counts)
        })
    }

    fn flush(&self, run_id: i64, batch: &mut Vec<NewFileEntry>) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }
        let written = self.db.add_entries(run_id, batch)?;
        debug!("Flushed {} entries to run {}", written, run_id);
        batch.clear();
        Ok(written)
    }
}

/// Fingerprint and stat one file. Any I/O failure turns into a skip, as
/// does a path that is not valid UTF-8: the store keeps paths as text and a
/// lossy conversion could merge distinct files.
fn index_file(base: &Path, path: &Path) -> std::result::Result<NewFileEntry, SkippedEntry> {
    let full_path = utf8(path, path)?;
    let filename = match path.file_name() {
        Some(name) => utf8(path, Path::new(name))?,
        None => String::new(),
    };
    let relative_path = match path.strip_prefix(base) {
        Ok(rel) if !rel.as_os_str().is_empty() => utf8(path, rel)?,
        _ => filename.clone(),
    };

    let content_hash = hasher::content_hash(path).map_err(|e| SkippedEntry::new(path, e))?;
    let times = read_file_times(path).map_err(|e| SkippedEntry::new(path, e))?;

    Ok(NewFileEntry {
        filename,
        full_path,
        relative_path,
        content_hash,
        created_time: times.created_string(),
        modified_time: times.modified_string(),
    })
}

fn utf8(path: &Path, part: &Path) -> std::result::Result<String, SkippedEntry> {
    part.to_str().map(str::to_owned).ok_or_else(|| {
        SkippedEntry::new(
            path,
            io::Error::new(io::ErrorKind::InvalidData, "path is not valid UTF-8"),
        )
    })
}

/// Absolute form of a base path as recorded on a run. Falls back to the
/// path as given when it no longer exists, so stale runs can still be cleared.
pub fn resolve_base_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
