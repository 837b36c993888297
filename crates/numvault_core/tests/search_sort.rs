use numvault_core::db::open_db_in_memory;
use numvault_core::{
    RecordDraft, RecordRepository, SortField, SortOrder, SqliteRecordRepository,
};
use std::collections::HashSet;

#[test]
fn blank_search_returns_empty_for_any_store_contents() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create(&RecordDraft::new("anything", 1.0)).unwrap();

    assert!(repo.search("").unwrap().is_empty());
    assert!(repo.search("   \t").unwrap().is_empty());
}

#[test]
fn digit_term_unions_name_substring_and_exact_value_matches() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let by_name = repo.create(&RecordDraft::new("7-Eleven", 3.5)).unwrap();
    let by_value = repo.create(&RecordDraft::new("lucky", 7.0)).unwrap();
    repo.create(&RecordDraft::new("neither", 8.0)).unwrap();

    let hits = repo.search("7").unwrap();
    let ids: HashSet<_> = hits.iter().map(|record| record.id).collect();
    assert_eq!(ids, HashSet::from([by_name.id, by_value.id]));
}

#[test]
fn record_matching_both_branches_is_returned_once() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let both = repo.create(&RecordDraft::new("route 66", 66.0)).unwrap();

    let hits = repo.search("66").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, both.id);
}

#[test]
fn name_search_is_case_insensitive_substring() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let hit = repo.create(&RecordDraft::new("Groceries", 120.0)).unwrap();
    repo.create(&RecordDraft::new("rent", 900.0)).unwrap();

    let hits = repo.search("GROCER").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, hit.id);
}

#[test]
fn non_digit_term_never_matches_by_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    repo.create(&RecordDraft::new("seven", 7.0)).unwrap();

    // "7.5" contains a non-digit, so only the substring branch applies.
    assert!(repo.search("7.5").unwrap().is_empty());
}

#[test]
fn sort_by_name_ascending_is_lexicographic() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    for name in ["pear", "apple", "mango"] {
        repo.create(&RecordDraft::new(name, 1.0)).unwrap();
    }

    let sorted = repo
        .sorted(SortField::Name, SortOrder::Ascending)
        .unwrap();
    let names: Vec<&str> = sorted.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec!["apple", "mango", "pear"]);
}

#[test]
fn sort_by_creation_time_descending_is_reverse_chronological() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    for name in ["first", "second", "third"] {
        repo.create(&RecordDraft::new(name, 1.0)).unwrap();
    }
    // Force distinct creation times; inserts inside one test can land on
    // the same millisecond.
    for (name, ms) in [("first", 1_000i64), ("second", 2_000), ("third", 3_000)] {
        conn.execute(
            "UPDATE records SET created_at = ?1, updated_at = ?1 WHERE name = ?2;",
            rusqlite::params![ms, name],
        )
        .unwrap();
    }

    let sorted = repo
        .sorted(SortField::CreatedAt, SortOrder::Descending)
        .unwrap();
    let names: Vec<&str> = sorted.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[test]
fn unknown_tokens_default_to_created_at_descending() {
    assert_eq!(SortField::parse("Name"), SortField::Name);
    assert_eq!(SortField::parse("CreatedAt"), SortField::CreatedAt);
    assert_eq!(SortField::parse("banana"), SortField::CreatedAt);

    assert_eq!(SortOrder::parse("Ascending"), SortOrder::Ascending);
    assert_eq!(SortOrder::parse("ascending"), SortOrder::Descending);
    assert_eq!(SortOrder::parse("anything"), SortOrder::Descending);
}
