use numvault_core::db::open_db_in_memory;
use numvault_core::{
    BackupObserver, BackupWriter, Record, RecordRepository, SqliteRecordRepository, VaultService,
};
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;
use uuid::Uuid;

fn vault_with_backups<'a>(
    conn: &'a rusqlite::Connection,
    backup_dir: &Path,
) -> (
    VaultService<'a, SqliteRecordRepository<'a>>,
    Rc<BackupWriter>,
) {
    let writer = Rc::new(BackupWriter::new(backup_dir));
    let service = VaultService::with_observers(
        SqliteRecordRepository::try_new(conn).unwrap(),
        vec![Box::new(BackupObserver::new(
            Rc::clone(&writer),
            SqliteRecordRepository::try_new(conn).unwrap(),
        ))],
    );
    (service, writer)
}

fn backup_count(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    std::fs::read_dir(dir).unwrap().count()
}

fn newest_snapshot(dir: &Path) -> Vec<Record> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    // Filenames embed timestamp + sequence, so lexicographic order is
    // write order.
    paths.sort();
    let raw = std::fs::read_to_string(paths.last().unwrap()).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn every_successful_mutation_writes_exactly_one_backup() {
    let conn = open_db_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let (service, _writer) = vault_with_backups(&conn, dir.path());

    let added = service.add("rent", 900.0).unwrap();
    assert_eq!(backup_count(dir.path()), 1);

    service.update(added.record.id, "rent", 950.0).unwrap();
    assert_eq!(backup_count(dir.path()), 2);

    service.delete(added.record.id).unwrap();
    assert_eq!(backup_count(dir.path()), 3);
}

#[test]
fn backup_contains_post_mutation_store_state() {
    let conn = open_db_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let (service, _writer) = vault_with_backups(&conn, dir.path());

    service.add("rent", 900.0).unwrap();
    let updated = service.add("food", 120.0).unwrap();

    let snapshot = newest_snapshot(dir.path());
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().any(|record| record.id == updated.record.id));

    service.delete(updated.record.id).unwrap();
    let snapshot = newest_snapshot(dir.path());
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].name, "rent");
}

#[test]
fn failed_or_missed_mutations_write_no_backup() {
    let conn = open_db_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let (service, _writer) = vault_with_backups(&conn, dir.path());

    assert!(service.add("  ", 1.0).is_err());
    assert!(service.update(Uuid::new_v4(), "x", 1.0).unwrap().is_none());
    assert!(service.delete(Uuid::new_v4()).unwrap().is_none());

    assert_eq!(backup_count(dir.path()), 0);
}

#[test]
fn read_operations_write_no_backup() {
    let conn = open_db_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let (service, _writer) = vault_with_backups(&conn, dir.path());

    service.add("seed", 1.0).unwrap();
    let baseline = backup_count(dir.path());

    service.list().unwrap();
    service.search("seed").unwrap();

    assert_eq!(backup_count(dir.path()), baseline);
}

#[test]
fn backup_failure_does_not_fail_the_mutation() {
    let conn = open_db_in_memory().unwrap();
    let dir = TempDir::new().unwrap();

    // A regular file at the backups path makes create_dir_all fail.
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, b"not a directory").unwrap();
    let (service, _writer) = vault_with_backups(&conn, &blocked);

    let mutated = service.add("rent", 900.0).unwrap();
    assert_eq!(mutated.side_effects.len(), 1);
    assert_eq!(mutated.side_effects[0].observer, "backup");

    // The mutation itself landed.
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    assert_eq!(repo.list().unwrap().len(), 1);
}

#[test]
fn manual_backup_is_independent_of_the_event_path() {
    let conn = open_db_in_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let (service, writer) = vault_with_backups(&conn, dir.path());

    service.add("rent", 900.0).unwrap();
    let after_mutation = backup_count(dir.path());

    let records = service.list().unwrap();
    let path = writer.write_snapshot(&records).unwrap();

    assert_eq!(backup_count(dir.path()), after_mutation + 1);
    let raw = std::fs::read_to_string(path).unwrap();
    let snapshot: Vec<Record> = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot, records);
}
