//! Record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD, search and sort APIs over the `records` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `RecordDraft::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `update` bumps `updated_at` strictly past its previous value.

use crate::db::DbError;
use crate::model::record::{Record, RecordDraft, RecordId, RecordValidationError};
use crate::search::term::SearchTerm;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    name,
    value,
    created_at,
    updated_at
FROM records";

const REQUIRED_COLUMNS: &[&str] = &["id", "name", "value", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not initialized: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sort key for [`RecordRepository::sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    CreatedAt,
}

impl SortField {
    /// Parses the user-facing token; anything but `Name` selects
    /// creation time.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "Name" {
            Self::Name
        } else {
            Self::CreatedAt
        }
    }
}

/// Sort direction for [`RecordRepository::sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parses the user-facing token; anything but the literal
    /// `Ascending` selects descending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "Ascending" {
            Self::Ascending
        } else {
            Self::Descending
        }
    }
}

/// Repository interface for record CRUD, search and sorted retrieval.
pub trait RecordRepository {
    fn create(&self, draft: &RecordDraft) -> RepoResult<Record>;
    fn get(&self, id: RecordId) -> RepoResult<Option<Record>>;
    fn update(&self, id: RecordId, draft: &RecordDraft) -> RepoResult<Option<Record>>;
    fn delete(&self, id: RecordId) -> RepoResult<Option<Record>>;
    fn list(&self) -> RepoResult<Vec<Record>>;
    fn search(&self, term: &str) -> RepoResult<Vec<Record>>;
    fn sorted(&self, field: SortField, order: SortOrder) -> RepoResult<Vec<Record>>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Wraps a connection after verifying it went through the migration
    /// bootstrap path.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` lags behind
    ///   the latest migration.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the expected `records` shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = crate::db::migrations::latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'records'
            );",
            [],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(RepoError::MissingRequiredTable("records"));
        }

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('records');")?;
        let mut rows = stmt.query([])?;
        let mut present = Vec::new();
        while let Some(row) = rows.next()? {
            present.push(row.get::<_, String>(0)?);
        }
        for &column in REQUIRED_COLUMNS {
            if !present.iter().any(|name| name == column) {
                return Err(RepoError::MissingRequiredColumn {
                    table: "records",
                    column,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create(&self, draft: &RecordDraft) -> RepoResult<Record> {
        draft.validate()?;

        // Both timestamps come from the same clock read, so a fresh
        // record always has created_at == updated_at.
        let now = now_millis();
        let record = Record {
            id: Uuid::new_v4(),
            name: draft.normalized_name().to_string(),
            value: draft.value,
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO records (id, name, value, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.id.to_string(),
                record.name.as_str(),
                record.value,
                record.created_at.timestamp_millis(),
                record.updated_at.timestamp_millis(),
            ],
        )?;

        Ok(record)
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let row = self
            .conn
            .query_row(
                &format!("{RECORD_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                raw_record_row,
            )
            .optional()?;

        row.map(RawRecordRow::into_record).transpose()
    }

    fn update(&self, id: RecordId, draft: &RecordDraft) -> RepoResult<Option<Record>> {
        draft.validate()?;

        let Some(existing) = self.get(id)? else {
            return Ok(None);
        };

        // Epoch-millisecond clocks can tie under fast successive calls;
        // bump past the previous value so `updated_at` strictly advances.
        let now = now_millis().timestamp_millis();
        let updated_ms = now.max(existing.updated_at.timestamp_millis() + 1);
        let updated_at = datetime_from_millis(updated_ms)?;

        self.conn.execute(
            "UPDATE records
             SET name = ?1, value = ?2, updated_at = ?3
             WHERE id = ?4;",
            params![
                draft.normalized_name(),
                draft.value,
                updated_ms,
                id.to_string(),
            ],
        )?;

        Ok(Some(Record {
            id: existing.id,
            name: draft.normalized_name().to_string(),
            value: draft.value,
            created_at: existing.created_at,
            updated_at,
        }))
    }

    fn delete(&self, id: RecordId) -> RepoResult<Option<Record>> {
        let Some(existing) = self.get(id)? else {
            return Ok(None);
        };

        self.conn
            .execute("DELETE FROM records WHERE id = ?1;", [id.to_string()])?;

        Ok(Some(existing))
    }

    fn list(&self) -> RepoResult<Vec<Record>> {
        self.query_records(&format!("{RECORD_SELECT_SQL};"))
    }

    fn search(&self, term: &str) -> RepoResult<Vec<Record>> {
        // Blank input means "match nothing", not "match everything".
        let Some(term) = SearchTerm::parse(term) else {
            return Ok(Vec::new());
        };

        let records = self.list()?;
        Ok(records
            .into_iter()
            .filter(|record| term.matches(record))
            .collect())
    }

    fn sorted(&self, field: SortField, order: SortOrder) -> RepoResult<Vec<Record>> {
        let key = match field {
            SortField::Name => "name",
            SortField::CreatedAt => "created_at",
        };
        let direction = match order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };

        self.query_records(&format!(
            "{RECORD_SELECT_SQL} ORDER BY {key} {direction}, id ASC;"
        ))
    }
}

impl SqliteRecordRepository<'_> {
    fn query_records(&self, sql: &str) -> RepoResult<Vec<Record>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(raw_record_row(row)?.into_record()?);
        }

        Ok(records)
    }
}

/// Row image before id/timestamp decoding.
struct RawRecordRow {
    id: String,
    name: String,
    value: f64,
    created_at: i64,
    updated_at: i64,
}

impl RawRecordRow {
    fn into_record(self) -> RepoResult<Record> {
        let id = Uuid::parse_str(&self.id).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{}` in records.id", self.id))
        })?;

        let created_at = datetime_from_millis(self.created_at)?;
        let updated_at = datetime_from_millis(self.updated_at)?;
        if updated_at < created_at {
            return Err(RepoError::InvalidData(format!(
                "record `{id}` has updated_at earlier than created_at"
            )));
        }

        Ok(Record {
            id,
            name: self.name,
            value: self.value,
            created_at,
            updated_at,
        })
    }
}

fn raw_record_row(row: &Row<'_>) -> Result<RawRecordRow, rusqlite::Error> {
    Ok(RawRecordRow {
        id: row.get("id")?,
        name: row.get("name")?,
        value: row.get("value")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn datetime_from_millis(ms: i64) -> RepoResult<chrono::DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| RepoError::InvalidData(format!("timestamp `{ms}` is out of range")))
}

/// Current wall-clock time truncated to millisecond resolution, so an
/// in-memory record compares equal to its persisted image.
fn now_millis() -> DateTime<Utc> {
    let ms = Utc::now().timestamp_millis();
    // timestamp_millis_opt of a value just produced by now() is always valid.
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}
