use numvault_core::db::open_db_in_memory;
use numvault_core::{
    collect_stats, write_export, RecordDraft, RecordRepository, SqliteRecordRepository,
};
use tempfile::TempDir;

#[test]
fn export_lists_every_record_with_header() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let rent = repo.create(&RecordDraft::new("rent", 900.0)).unwrap();
    let food = repo.create(&RecordDraft::new("food", 120.5)).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.txt");
    write_export(&path, &repo.list().unwrap()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Exported At: "));
    assert!(text.contains("Total Records: 2"));
    assert!(text.contains(&format!("ID: {}", rent.id)));
    assert!(text.contains(&format!("ID: {}", food.id)));
    assert!(text.contains("Name: food | Value: 120.5"));
}

#[test]
fn export_overwrites_previous_artifact() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("export.txt");

    repo.create(&RecordDraft::new("only", 1.0)).unwrap();
    write_export(&path, &repo.list().unwrap()).unwrap();

    let record = repo.list().unwrap()[0].clone();
    repo.delete(record.id).unwrap();
    write_export(&path, &repo.list().unwrap()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Total Records: 0"));
    assert!(!text.contains("only"));
}

#[test]
fn stats_over_repository_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    assert!(collect_stats(&repo.list().unwrap()).is_none());

    repo.create(&RecordDraft::new("short", 1.0)).unwrap();
    let longest = repo
        .create(&RecordDraft::new("a much longer name", 2.0))
        .unwrap();
    let updated = repo.create(&RecordDraft::new("fresh", 3.0)).unwrap();
    let updated = repo
        .update(updated.id, &RecordDraft::new("fresh", 4.0))
        .unwrap()
        .unwrap();

    let stats = collect_stats(&repo.list().unwrap()).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.longest_name, longest.name);
    assert_eq!(stats.last_modified, updated.updated_at);
    assert!(stats.earliest_created <= stats.latest_created);
}
