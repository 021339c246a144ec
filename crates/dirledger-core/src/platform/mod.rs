use std::fs::Metadata;
use std::io;
use std::time::SystemTime;

/// Best available creation time for a file.
///
/// Uses the native birth time when the platform and filesystem report one.
/// Otherwise falls back to the last metadata change time on Unix, so callers
/// must treat the result as approximate there.
pub fn creation_time(metadata: &Metadata) -> io::Result<SystemTime> {
    match metadata.created() {
        Ok(created) => Ok(created),
        Err(err) => fallback_creation_time(metadata, err),
    }
}

#[cfg(unix)]
fn fallback_creation_time(metadata: &Metadata, _err: io::Error) -> io::Result<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::{Duration, UNIX_EPOCH};

    // Pre-epoch change times are clamped to the epoch.
    let secs = metadata.ctime().max(0) as u64;
    let nanos = metadata.ctime_nsec().clamp(0, 999_999_999) as u32;
    let changed = UNIX_EPOCH + Duration::new(secs, nanos);
    Ok(changed)
}

#[cfg(not(unix))]
fn fallback_creation_time(_metadata: &Metadata, err: io::Error) -> io::Result<SystemTime> {
    Err(err)
}
