use crate::platform;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::io;
use std::path::Path;

/// Creation and modification instants of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTimes {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl FileTimes {
    pub fn created_string(&self) -> String {
        format_timestamp(&self.created)
    }

    pub fn modified_string(&self) -> String {
        format_timestamp(&self.modified)
    }
}

/// Read (created, modified) for `path`. See [`platform::creation_time`] for
/// how creation time is approximated where it is not recorded.
pub fn read_file_times(path: &Path) -> io::Result<FileTimes> {
    let metadata = fs::metadata(path)?;
    let created = platform::creation_time(&metadata)?;
    let modified = metadata.modified()?;
    Ok(FileTimes {
        created: DateTime::<Utc>::from(created),
        modified: DateTime::<Utc>::from(modified),
    })
}

/// Persisted form: UTC, microsecond precision, `Z` suffix. The fixed width
/// keeps lexical and chronological order in step.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
