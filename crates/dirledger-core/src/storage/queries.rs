use super::models::*;
use super::sqlite::Database;
use crate::error::{Error, Result};
use crate::scanner::format_timestamp;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

const INSERT_ENTRY: &str = "INSERT INTO file_entry \
     (run_id, filename, full_path, relative_path, content_hash, created_time, modified_time) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

impl Database {
    // ── Scan Runs ────────────────────────────────────────────────

    pub fn create_run(&self, run_identifier: &str, drive_name: &str, base_path: &str) -> Result<i64> {
        let now = format_timestamp(&chrono::Utc::now());
        self.connection().execute(
            "INSERT INTO scan_run (run_identifier, drive_name, base_path, scan_timestamp) \
             VALUES (?1, ?2, ?3, ?4)",
            params![run_identifier, drive_name, base_path, now],
        )?;
        let run_id = self.connection().last_insert_rowid();
        debug!("Created scan run {} ('{}') for {}", run_id, run_identifier, base_path);
        Ok(run_id)
    }

    pub fn get_run(&self, run_id: i64) -> Result<Option<ScanRun>> {
        let run = self
            .connection()
            .query_row(
                "SELECT run_id, run_identifier, drive_name, base_path, scan_timestamp \
                 FROM scan_run WHERE run_id = ?1",
                params![run_id],
                scan_run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    /// All runs newest-first, each paired with its entry count.
    pub fn list_runs(&self) -> Result<Vec<(ScanRun, i64)>> {
        let mut stmt = self.connection().prepare(
            "SELECT r.run_id, r.run_identifier, r.drive_name, r.base_path, r.scan_timestamp, \
                    COUNT(f.id) AS entry_count \
             FROM scan_run r \
             LEFT JOIN file_entry f ON f.run_id = r.run_id \
             GROUP BY r.run_id \
             ORDER BY r.run_id DESC",
        )?;
        let runs = stmt
            .query_map([], |row| Ok((scan_run_from_row(row)?, row.get::<_, i64>(5)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(runs)
    }

    /// Delete every run whose base path matches exactly, together with its
    /// entries. Matching nothing is not an error.
    pub fn clear_path(&self, base_path: &str) -> Result<ClearSummary> {
        let tx = self.connection().unchecked_transaction()?;
        let entries_removed = tx.execute(
            "DELETE FROM file_entry \
             WHERE run_id IN (SELECT run_id FROM scan_run WHERE base_path = ?1)",
            params![base_path],
        )?;
        let runs_removed = tx.execute(
            "DELETE FROM scan_run WHERE base_path = ?1",
            params![base_path],
        )?;
        tx.commit()?;
        debug!(
            "Cleared {} runs / {} entries for {}",
            runs_removed, entries_removed, base_path
        );
        Ok(ClearSummary {
            runs_removed,
            entries_removed,
        })
    }

    // ── File Entries ─────────────────────────────────────────────

    pub fn add_entry(&self, run_id: i64, entry: &NewFileEntry) -> Result<i64> {
        self.connection()
            .execute(
                INSERT_ENTRY,
                params![
                    run_id,
                    entry.filename,
                    entry.full_path,
                    entry.relative_path,
                    entry.content_hash,
                    entry.created_time,
                    entry.modified_time,
                ],
            )
            .map_err(|e| referential(run_id, e))?;
        Ok(self.connection().last_insert_rowid())
    }

    /// Insert a batch of entries in one transaction.
    pub fn add_entries(&self, run_id: i64, entries: &[NewFileEntry]) -> Result<usize> {
        let tx = self.connection().unchecked_transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare_cached(INSERT_ENTRY)?;
            for entry in entries {
                count += stmt
                    .execute(params![
                        run_id,
                        entry.filename,
                        entry.full_path,
                        entry.relative_path,
                        entry.content_hash,
                        entry.created_time,
                        entry.modified_time,
                    ])
                    .map_err(|e| referential(run_id, e))?;
            }
        }
        tx.commit()?;
        debug!("Inserted {} entries for run {}", count, run_id);
        Ok(count)
    }

    pub fn entries_for_run(&self, run_id: i64) -> Result<Vec<FileEntry>> {
        let mut stmt = self.connection().prepare(
            "SELECT id, run_id, filename, full_path, relative_path, content_hash, \
                    created_time, modified_time \
             FROM file_entry WHERE run_id = ?1 \
             ORDER BY full_path",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(FileEntry {
                    id: row.get(0)?,
                    run_id: row.get(1)?,
                    filename: row.get(2)?,
                    full_path: row.get(3)?,
                    relative_path: row.get(4)?,
                    content_hash: row.get(5)?,
                    created_time: row.get(6)?,
                    modified_time: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    // ── Cross-run Analysis ───────────────────────────────────────

    /// Every occurrence of a (filename, content_hash) pair that is present
    /// under at least two distinct full paths, across all runs.
    ///
    /// Ordered by filename, hash, run identifier, then path, so consecutive
    /// rows sharing (filename, content_hash) form one group.
    pub fn find_duplicates(&self) -> Result<Vec<DuplicateRow>> {
        let mut stmt = self.connection().prepare(
            "WITH duplicate_keys AS ( \
                 SELECT filename, content_hash \
                 FROM file_entry \
                 GROUP BY filename, content_hash \
                 HAVING COUNT(DISTINCT full_path) > 1 \
             ) \
             SELECT f.filename, f.content_hash, f.full_path, r.run_identifier \
             FROM file_entry f \
             JOIN scan_run r ON r.run_id = f.run_id \
             JOIN duplicate_keys d \
               ON d.filename = f.filename AND d.content_hash = f.content_hash \
             ORDER BY f.filename, f.content_hash, r.run_identifier, f.full_path",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DuplicateRow {
                    filename: row.get(0)?,
                    content_hash: row.get(1)?,
                    full_path: row.get(2)?,
                    run_identifier: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Every occurrence of a filename seen with more than one content hash,
    /// ranked per filename by modification time (newest is rank 1).
    ///
    /// Times are stored as UTC RFC 3339 with a fixed precision, so text order
    /// is chronological. Equal times fall back to path, then insertion order.
    pub fn find_modified(&self) -> Result<Vec<ModifiedRow>> {
        let mut stmt = self.connection().prepare(
            "WITH modified_names AS ( \
                 SELECT filename \
                 FROM file_entry \
                 GROUP BY filename \
                 HAVING COUNT(DISTINCT content_hash) > 1 \
             ), \
             versions AS ( \
                 SELECT f.filename, f.content_hash, f.full_path, f.modified_time, \
                        r.run_identifier, \
                        ROW_NUMBER() OVER ( \
                            PARTITION BY f.filename \
                            ORDER BY f.modified_time DESC, f.full_path ASC, f.id ASC \
                        ) AS version_rank \
                 FROM file_entry f \
                 JOIN scan_run r ON r.run_id = f.run_id \
                 JOIN modified_names m ON m.filename = f.filename \
             ) \
             SELECT filename, content_hash, full_path, modified_time, run_identifier, version_rank \
             FROM versions \
             ORDER BY filename, version_rank",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ModifiedRow {
                    filename: row.get(0)?,
                    content_hash: row.get(1)?,
                    full_path: row.get(2)?,
                    modified_time: row.get(3)?,
                    run_identifier: row.get(4)?,
                    version_rank: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn scan_run_from_row(row: &Row<'_>) -> rusqlite::Result<ScanRun> {
    Ok(ScanRun {
        run_id: row.get(0)?,
        run_identifier: row.get(1)?,
        drive_name: row.get(2)?,
        base_path: row.get(3)?,
        scan_timestamp: row.get(4)?,
    })
}

fn referential(run_id: i64, err: rusqlite::Error) -> Error {
    if is_foreign_key_violation(&err) {
        Error::RunNotFound(run_id)
    } else {
        Error::Database(err)
    }
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}
