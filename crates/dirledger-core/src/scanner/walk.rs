use super::SkippedEntry;
use glob::Pattern;
use std::io;
use std::path::{Path, PathBuf};
use tracing::error;
use walkdir::WalkDir;

/// Compiled glob ignore patterns. Invalid patterns are logged and dropped.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Self {
        let patterns = globs
            .iter()
            .filter_map(|glob| match Pattern::new(glob.as_ref()) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob.as_ref(), e);
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches_path(path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Lazy recursive enumeration of the regular files under a root.
///
/// Symlinks are never followed and are not indexed themselves; neither are
/// sockets, FIFOs or device nodes. An entry that cannot be read yields an
/// `Err` and the walk carries on with the next one. Each walker starts from
/// scratch, so re-scanning means building a new one.
pub struct FileWalker {
    entries: walkdir::IntoIter,
    ignore: IgnoreSet,
    excluded: Vec<PathBuf>,
}

impl FileWalker {
    pub fn new(root: &Path) -> Self {
        Self {
            entries: WalkDir::new(root).follow_links(false).into_iter(),
            ignore: IgnoreSet::default(),
            excluded: Vec::new(),
        }
    }

    /// Prune directories and skip files matching any of these patterns.
    pub fn with_ignore(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = ignore;
        self
    }

    /// Exact paths never to yield, e.g. the run store's own files.
    pub fn with_excluded(mut self, excluded: Vec<PathBuf>) -> Self {
        self.excluded = excluded;
        self
    }
}

impl Iterator for FileWalker {
    type Item = Result<PathBuf, SkippedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(Err(skipped_from_walk_error(err))),
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if entry.depth() > 0 && self.ignore.matches(entry.path()) {
                    self.entries.skip_current_dir();
                }
                continue;
            }
            if !file_type.is_file() {
                continue;
            }
            if self.ignore.matches(entry.path())
                || self.excluded.iter().any(|p| p == entry.path())
            {
                continue;
            }
            return Some(Ok(entry.into_path()));
        }
    }
}

fn skipped_from_walk_error(err: walkdir::Error) -> SkippedEntry {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    let kind = err
        .io_error()
        .map(|e| e.kind())
        .unwrap_or(io::ErrorKind::Other);
    SkippedEntry::new(path, io::Error::new(kind, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn collect_files(walker: FileWalker) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walker.filter_map(Result::ok).collect();
        files.sort();
        files
    }

    #[test]
    fn test_walk_recurses_into_subdirectories() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::write(root.join("top.txt"), "1").unwrap();
        fs::write(root.join("a/mid.txt"), "2").unwrap();
        fs::write(root.join("a/b/c/deep.txt"), "3").unwrap();

        let files = collect_files(FileWalker::new(root));
        assert_eq!(
            files,
            vec![
                root.join("a/b/c/deep.txt"),
                root.join("a/mid.txt"),
                root.join("top.txt"),
            ]
        );
    }

    #[test]
    fn test_walk_is_restartable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.txt"), "1").unwrap();

        assert_eq!(collect_files(FileWalker::new(dir.path())).len(), 1);
        fs::write(dir.path().join("two.txt"), "2").unwrap();
        assert_eq!(collect_files(FileWalker::new(dir.path())).len(), 2);
    }

    #[test]
    fn test_ignore_patterns_prune_dirs_and_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "x").unwrap();
        fs::write(root.join("keep.txt"), "k").unwrap();
        fs::write(root.join("scratch.tmp"), "t").unwrap();

        let ignore = IgnoreSet::new(&["*/node_modules", "*.tmp"]);
        let files = collect_files(FileWalker::new(root).with_ignore(ignore));
        assert_eq!(files, vec![root.join("keep.txt")]);
    }

    #[test]
    fn test_missing_root_yields_error_item() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("missing");

        let items: Vec<_> = FileWalker::new(&root).collect();
        assert_eq!(items.len(), 1);
        let skipped = items.into_iter().next().unwrap().unwrap_err();
        assert_eq!(skipped.path, root);
        assert_eq!(skipped.error.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_invalid_pattern_is_dropped() {
        let ignore = IgnoreSet::new(&["[unterminated", "*.log"]);
        assert_eq!(ignore.len(), 1);
    }

    #[test]
    fn test_excluded_paths_are_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("store.db"), "db").unwrap();
        fs::write(root.join("data.txt"), "d").unwrap();

        let files = collect_files(
            FileWalker::new(root).with_excluded(vec![root.join("store.db")]),
        );
        assert_eq!(files, vec![root.join("data.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("real")).unwrap();
        fs::write(root.join("real/file.txt"), "f").unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("loop")).unwrap();
        std::os::unix::fs::symlink(root.join("real/file.txt"), root.join("link.txt")).unwrap();

        let files = collect_files(FileWalker::new(root));
        assert_eq!(files, vec![root.join("real/file.txt")]);
    }
}
