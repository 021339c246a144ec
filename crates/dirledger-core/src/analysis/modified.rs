use crate::error::Result;
use crate::storage::models::ModifiedRow;
use crate::storage::Database;
use std::fmt::Write as _;

/// A filename seen with more than one content hash, versions newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedFile {
    pub filename: String,
    pub versions: Vec<ModifiedRow>,
}

impl ModifiedFile {
    pub fn latest(&self) -> Option<&ModifiedRow> {
        self.versions.iter().find(|v| v.version_rank == 1)
    }
}

pub fn find_modified_files(db: &Database) -> Result<Vec<ModifiedFile>> {
    Ok(group_modified(db.find_modified()?))
}

/// Collapse consecutive rows sharing a filename.
pub fn group_modified(rows: Vec<ModifiedRow>) -> Vec<ModifiedFile> {
    let mut files: Vec<ModifiedFile> = Vec::new();

    for row in rows {
        match files.last_mut() {
            Some(file) if file.filename == row.filename => file.versions.push(row),
            _ => files.push(ModifiedFile {
                filename: row.filename.clone(),
                versions: vec![row],
            }),
        }
    }

    files
}

pub fn render_modified(files: &[ModifiedFile]) -> String {
    if files.is_empty() {
        return "No modified files found.\n".to_string();
    }

    let mut out = String::new();
    for file in files {
        let _ = writeln!(out, "\nFile: {}", file.filename);
        for version in &file.versions {
            let latest = if version.version_rank == 1 {
                " (latest version)"
            } else {
                ""
            };
            let _ = writeln!(out, "  Run '{}': {}", version.run_identifier, version.full_path);
            let _ = writeln!(out, "    Modified: {}", version.modified_time);
            let _ = writeln!(out, "    Content hash: {}{}", version.content_hash, latest);
        }
    }
    out
}
