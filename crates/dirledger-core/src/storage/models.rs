/// One invocation of the indexing pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRun {
    pub run_id: i64,
    pub run_identifier: String,
    pub drive_name: String,
    pub base_path: String,
    pub scan_timestamp: String,
}

/// A file observed under a run, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: i64,
    pub run_id: i64,
    pub filename: String,
    pub full_path: String,
    pub relative_path: String,
    pub content_hash: String,
    pub created_time: String,
    pub modified_time: String,
}

/// Field set for inserting a file entry; the owning run is passed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileEntry {
    pub filename: String,
    pub full_path: String,
    pub relative_path: String,
    pub content_hash: String,
    pub created_time: String,
    pub modified_time: String,
}

/// One occurrence of a (filename, content_hash) pair found under more than
/// one distinct path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRow {
    pub filename: String,
    pub content_hash: String,
    pub full_path: String,
    pub run_identifier: String,
}

/// One occurrence of a filename that has been seen with more than one hash.
/// `version_rank` 1 is the most recently modified occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedRow {
    pub filename: String,
    pub content_hash: String,
    pub full_path: String,
    pub modified_time: String,
    pub run_identifier: String,
    pub version_rank: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearSummary {
    pub runs_removed: usize,
    pub entries_removed: usize,
}

impl ClearSummary {
    pub fn is_empty(&self) -> bool {
        self.runs_removed == 0
    }
}
