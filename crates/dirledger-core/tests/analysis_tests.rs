use dirledger_core::analysis::{find_duplicate_groups, find_modified_files};
use dirledger_core::storage::models::NewFileEntry;
use dirledger_core::storage::Database;

fn make_entry(path: &str, hash: &str, modified: &str) -> NewFileEntry {
    NewFileEntry {
        filename: path.rsplit('/').next().unwrap_or(path).to_string(),
        full_path: path.to_string(),
        relative_path: path.trim_start_matches('/').to_string(),
        content_hash: hash.to_string(),
        created_time: "2024-01-01T00:00:00.000000Z".to_string(),
        modified_time: modified.to_string(),
    }
}

const T1: &str = "2024-01-01T00:00:00.000000Z";
const T2: &str = "2024-06-01T00:00:00.000000Z";
const T3: &str = "2024-09-01T00:00:00.000000Z";

fn setup_run(db: &Database, identifier: &str, base: &str, files: &[(&str, &str, &str)]) -> i64 {
    let run_id = db.create_run(identifier, "disk", base).unwrap();
    let entries: Vec<NewFileEntry> = files
        .iter()
        .map(|(path, hash, modified)| make_entry(path, hash, modified))
        .collect();
    db.add_entries(run_id, &entries).unwrap();
    run_id
}

// ── find_duplicates ──────────────────────────────────────────────

#[test]
fn test_duplicates_empty_store() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.find_duplicates().unwrap().is_empty());
}

#[test]
fn test_duplicates_none_when_names_or_hashes_differ() {
    let db = Database::open_in_memory().unwrap();
    setup_run(
        &db,
        "A",
        "/x",
        &[
            ("/x/a.txt", "h1", T1),
            ("/x/b.txt", "h1", T1),
            ("/x/sub/c.txt", "h2", T1),
        ],
    );
    assert!(db.find_duplicates().unwrap().is_empty());
}

#[test]
fn test_same_path_across_runs_is_not_a_duplicate() {
    let db = Database::open_in_memory().unwrap();
    setup_run(&db, "A", "/x", &[("/x/f.txt", "h1", T1)]);
    setup_run(&db, "B", "/x", &[("/x/f.txt", "h1", T1)]);
    assert!(db.find_duplicates().unwrap().is_empty());
}

#[test]
fn test_duplicates_across_runs_form_one_group() {
    let db = Database::open_in_memory().unwrap();
    setup_run(&db, "A", "/x", &[("/x/a/f.txt", "hash", T1)]);
    setup_run(&db, "B", "/x", &[("/x/b/f.txt", "hash", T2)]);

    let rows = db.find_duplicates().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].filename, "f.txt");
    assert_eq!(rows[0].run_identifier, "A");
    assert_eq!(rows[0].full_path, "/x/a/f.txt");
    assert_eq!(rows[1].run_identifier, "B");
    assert_eq!(rows[1].full_path, "/x/b/f.txt");

    let groups = find_duplicate_groups(&db).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].content_hash, "hash");
    assert_eq!(groups[0].occurrences.len(), 2);
}

#[test]
fn test_duplicates_within_one_run() {
    let db = Database::open_in_memory().unwrap();
    setup_run(
        &db,
        "A",
        "/x",
        &[("/x/one/dup.bin", "h", T1), ("/x/two/dup.bin", "h", T1)],
    );
    let groups = find_duplicate_groups(&db).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].occurrences.len(), 2);
}

#[test]
fn test_duplicates_ordered_by_name_hash_run() {
    let db = Database::open_in_memory().unwrap();
    setup_run(
        &db,
        "run-b",
        "/x",
        &[
            ("/x/1/z.txt", "hz", T1),
            ("/x/2/z.txt", "hz", T1),
            ("/x/1/a.txt", "h2", T1),
            ("/x/2/a.txt", "h2", T1),
        ],
    );
    setup_run(
        &db,
        "run-a",
        "/y",
        &[("/y/1/a.txt", "h1", T1), ("/y/2/a.txt", "h1", T1), ("/y/3/a.txt", "h2", T1)],
    );

    let rows = db.find_duplicates().unwrap();
    let keys: Vec<(&str, &str, &str)> = rows
        .iter()
        .map(|r| (r.filename.as_str(), r.content_hash.as_str(), r.run_identifier.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("a.txt", "h1", "run-a"),
            ("a.txt", "h1", "run-a"),
            ("a.txt", "h2", "run-a"),
            ("a.txt", "h2", "run-b"),
            ("a.txt", "h2", "run-b"),
            ("z.txt", "hz", "run-b"),
            ("z.txt", "hz", "run-b"),
        ]
    );

    let groups = find_duplicate_groups(&db).unwrap();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[1].occurrences.len(), 3);
}

#[test]
fn test_duplicates_query_is_read_only() {
    let db = Database::open_in_memory().unwrap();
    let run_id = setup_run(&db, "A", "/x", &[("/x/a/f", "h", T1), ("/x/b/f", "h", T1)]);
    db.find_duplicates().unwrap();
    db.find_modified().unwrap();
    assert_eq!(db.entries_for_run(run_id).unwrap().len(), 2);
}

// ── find_modified ────────────────────────────────────────────────

#[test]
fn test_modified_empty_when_hashes_agree() {
    let db = Database::open_in_memory().unwrap();
    setup_run(&db, "A", "/x", &[("/x/f.txt", "h1", T1)]);
    setup_run(&db, "B", "/x", &[("/x/f.txt", "h1", T2), ("/x/g.txt", "h9", T2)]);
    assert!(db.find_modified().unwrap().is_empty());
}

#[test]
fn test_modified_latest_ranked_first() {
    let db = Database::open_in_memory().unwrap();
    setup_run(&db, "A", "/x", &[("/x/f.txt", "H1", T1)]);
    setup_run(&db, "B", "/x", &[("/x/f.txt", "H2", T2)]);

    let rows = db.find_modified().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].version_rank, 1);
    assert_eq!(rows[0].content_hash, "H2");
    assert_eq!(rows[0].modified_time, T2);
    assert_eq!(rows[0].run_identifier, "B");
    assert_eq!(rows[1].version_rank, 2);
    assert_eq!(rows[1].content_hash, "H1");

    let files = find_modified_files(&db).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].latest().unwrap().content_hash, "H2");
}

#[test]
fn test_modified_includes_every_occurrence() {
    let db = Database::open_in_memory().unwrap();
    setup_run(
        &db,
        "A",
        "/x",
        &[("/x/f.txt", "H1", T1), ("/x/copy/f.txt", "H1", T1), ("/x/other.txt", "O", T1)],
    );
    setup_run(&db, "B", "/x", &[("/x/f.txt", "H2", T2)]);
    setup_run(&db, "C", "/x", &[("/x/f.txt", "H3", T3)]);

    let rows = db.find_modified().unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.filename == "f.txt"));
    let ranks: Vec<i64> = rows.iter().map(|r| r.version_rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
    assert_eq!(rows[0].content_hash, "H3");
    assert_eq!(rows.iter().filter(|r| r.version_rank == 1).count(), 1);
}

#[test]
fn test_modified_ties_broken_by_path() {
    let db = Database::open_in_memory().unwrap();
    setup_run(
        &db,
        "A",
        "/x",
        &[("/x/b/f.txt", "H1", T2), ("/x/a/f.txt", "H2", T2), ("/x/c/f.txt", "H3", T1)],
    );

    let first = db.find_modified().unwrap();
    assert_eq!(first[0].full_path, "/x/a/f.txt");
    assert_eq!(first[1].full_path, "/x/b/f.txt");
    assert_eq!(first[2].full_path, "/x/c/f.txt");

    for _ in 0..3 {
        assert_eq!(db.find_modified().unwrap(), first);
    }
}

#[test]
fn test_modified_ordered_by_filename() {
    let db = Database::open_in_memory().unwrap();
    setup_run(
        &db,
        "A",
        "/x",
        &[
            ("/x/1/zeta", "z1", T1),
            ("/x/2/zeta", "z2", T2),
            ("/x/1/alpha", "a1", T1),
            ("/x/2/alpha", "a2", T2),
        ],
    );
    let files = find_modified_files(&db).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
    assert!(files.iter().all(|f| f.versions[0].version_rank == 1));
}

#[test]
fn test_clear_removes_runs_from_analysis() {
    let db = Database::open_in_memory().unwrap();
    setup_run(&db, "A", "/x", &[("/x/a/f.txt", "h", T1)]);
    setup_run(&db, "B", "/y", &[("/y/b/f.txt", "h", T1)]);
    assert_eq!(find_duplicate_groups(&db).unwrap().len(), 1);

    db.clear_path("/y").unwrap();
    assert!(find_duplicate_groups(&db).unwrap().is_empty());
}
