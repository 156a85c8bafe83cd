//! Competence store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `competences` storage.
//! - Keep SQL details inside the core persistence boundary.
//! - Map unique-index violations on `code` to a semantic duplicate error.
//!
//! # Invariants
//! - `code` uniqueness is enforced here, by the store, not by callers.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - A failed write leaves the prior row state entirely unchanged.

use crate::db::DbError;
use crate::model::competence::{
    Competence, CompetenceId, CompetenceValidationError, GlobalStatus, SubCompetence,
};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const COMPETENCE_SELECT_SQL: &str = "SELECT
    uuid,
    code,
    name,
    sub_competences,
    global_status
FROM competences";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for competence persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Malformed or missing input; user-correctable.
    Validation(CompetenceValidationError),
    /// Another record already holds this `code`.
    DuplicateCode(String),
    /// The identity does not resolve to a record.
    NotFound(CompetenceId),
    /// Underlying persistence failed or rejected the operation.
    Db(DbError),
    /// Persisted state could not be decoded back into a record.
    InvalidData(String),
}

/// Fixed four-way failure classification consumed by transport layers.
///
/// Transport maps `Validation` and `DuplicateKey` to the bad-request
/// class, `NotFound` to the not-found class and `Store` to the
/// server-error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    DuplicateKey,
    NotFound,
    Store,
}

impl RepoError {
    /// Classifies this error for transport-layer status mapping.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::DuplicateCode(_) => FailureKind::DuplicateKey,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Db(_) | Self::InvalidData(_) => FailureKind::Store,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateCode(code) => write!(f, "competence code already exists: {code}"),
            Self::NotFound(id) => write!(f, "competence not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted competence data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateCode(_) | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<CompetenceValidationError> for RepoError {
    fn from(value: CompetenceValidationError) -> Self {
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

/// Store contract for competence CRUD operations.
///
/// Mirrors the persistence collaborator the service layer consumes:
/// list, fetch, insert with uniqueness enforcement, save, delete.
pub trait CompetenceRepository {
    fn find(&self) -> RepoResult<Vec<Competence>>;
    fn find_by_id(&self, id: CompetenceId) -> RepoResult<Option<Competence>>;
    fn insert(&self, record: &Competence) -> RepoResult<CompetenceId>;
    fn save(&self, record: &Competence) -> RepoResult<()>;
    fn delete_by_id(&self, id: CompetenceId) -> RepoResult<Option<Competence>>;
}

/// SQLite-backed competence repository.
pub struct SqliteCompetenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompetenceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CompetenceRepository for SqliteCompetenceRepository<'_> {
    fn find(&self) -> RepoResult<Vec<Competence>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMPETENCE_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_competence_row(row)?);
        }

        Ok(records)
    }

    fn find_by_id(&self, id: CompetenceId) -> RepoResult<Option<Competence>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMPETENCE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_competence_row(row)?));
        }

        Ok(None)
    }

    fn insert(&self, record: &Competence) -> RepoResult<CompetenceId> {
        let result = self.conn.execute(
            "INSERT INTO competences (uuid, code, name, sub_competences, global_status)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.uuid.to_string(),
                record.code.as_str(),
                record.name.as_str(),
                encode_sub_competences(&record.sub_competences)?,
                record.global_status.as_str(),
            ],
        );

        match result {
            Ok(_) => Ok(record.uuid),
            Err(err) => Err(classify_write_error(err, &record.code)),
        }
    }

    fn save(&self, record: &Competence) -> RepoResult<()> {
        let result = self.conn.execute(
            "UPDATE competences
             SET
                code = ?1,
                name = ?2,
                sub_competences = ?3,
                global_status = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                record.code.as_str(),
                record.name.as_str(),
                encode_sub_competences(&record.sub_competences)?,
                record.global_status.as_str(),
                record.uuid.to_string(),
            ],
        );

        match result {
            Ok(0) => Err(RepoError::NotFound(record.uuid)),
            Ok(_) => Ok(()),
            Err(err) => Err(classify_write_error(err, &record.code)),
        }
    }

    fn delete_by_id(&self, id: CompetenceId) -> RepoResult<Option<Competence>> {
        let existing = self.find_by_id(id)?;
        if existing.is_none() {
            return Ok(None);
        }

        self.conn
            .execute("DELETE FROM competences WHERE uuid = ?1;", [id.to_string()])?;

        Ok(existing)
    }
}

fn parse_competence_row(row: &Row<'_>) -> RepoResult<Competence> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in competences.uuid"))
    })?;

    let sub_json: String = row.get("sub_competences")?;
    let sub_competences: Vec<SubCompetence> = serde_json::from_str(&sub_json).map_err(|err| {
        RepoError::InvalidData(format!(
            "undecodable competences.sub_competences for `{uuid_text}`: {err}"
        ))
    })?;

    let status_text: String = row.get("global_status")?;
    let global_status = GlobalStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status value `{status_text}` in competences.global_status"
        ))
    })?;

    Ok(Competence {
        uuid,
        code: row.get("code")?,
        name: row.get("name")?,
        sub_competences,
        global_status,
    })
}

fn encode_sub_competences(sub_competences: &[SubCompetence]) -> RepoResult<String> {
    serde_json::to_string(sub_competences)
        .map_err(|err| RepoError::InvalidData(format!("unencodable sub-competences: {err}")))
}

/// Maps a unique-index violation on `code` to `DuplicateCode`; everything
/// else stays a transport-level DB error.
fn classify_write_error(err: rusqlite::Error, code: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return RepoError::DuplicateCode(code.to_string());
        }
    }
    RepoError::Db(DbError::Sqlite(err))
}
