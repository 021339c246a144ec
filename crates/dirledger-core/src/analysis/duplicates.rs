use crate::error::Result;
use crate::storage::models::DuplicateRow;
use crate::storage::Database;
use std::fmt::Write as _;

/// Where one copy of a duplicated file was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub run_identifier: String,
    pub full_path: String,
}

/// All occurrences of one (filename, content_hash) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub filename: String,
    pub content_hash: String,
    pub occurrences: Vec<Occurrence>,
}

pub fn find_duplicate_groups(db: &Database) -> Result<Vec<DuplicateGroup>> {
    Ok(group_duplicates(db.find_duplicates()?))
}

/// Collapse consecutive rows sharing (filename, content_hash).
pub fn group_duplicates(rows: Vec<DuplicateRow>) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for row in rows {
        let occurrence = Occurrence {
            run_identifier: row.run_identifier,
            full_path: row.full_path,
        };
        match groups.last_mut() {
            Some(group)
                if group.filename == row.filename && group.content_hash == row.content_hash =>
            {
                group.occurrences.push(occurrence);
            }
            _ => groups.push(DuplicateGroup {
                filename: row.filename,
                content_hash: row.content_hash,
                occurrences: vec![occurrence],
            }),
        }
    }

    groups
}

pub fn render_duplicates(groups: &[DuplicateGroup]) -> String {
    if groups.is_empty() {
        return "No duplicate files found.\n".to_string();
    }

    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "\nDuplicate file: {}", group.filename);
        let _ = writeln!(out, "Content hash: {}", group.content_hash);
        for occ in &group.occurrences {
            let _ = writeln!(out, "  Run '{}': {}", occ.run_identifier, occ.full_path);
        }
    }
    out
}
