//! Issue store contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the two store operations seeding depends on: list and create.
//! - Keep SQL details inside the SQLite adapter.
//!
//! # Invariants
//! - Create paths call `NewIssue::validate()` before any SQL mutation.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - List results are returned in insertion order.

use crate::db::DbError;
use crate::model::issue::{Issue, IssueId, IssueType, IssueValidationError, NewIssue, Priority};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ISSUE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    type,
    priority,
    description
FROM issues";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error surfaced by any issue store implementation.
#[derive(Debug)]
pub enum RepoError {
    Validation(IssueValidationError),
    Db(DbError),
    InvalidData(String),
    /// Failure reported by a non-SQLite store backend.
    Backend(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted issue data: {message}"),
            Self::Backend(message) => write!(f, "issue store error: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::Backend(_) => None,
        }
    }
}

impl From<IssueValidationError> for RepoError {
    fn from(value: IssueValidationError) -> Self {
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

/// Filter for listing issues. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueListQuery {
    pub kind: Option<IssueType>,
    /// `None` means "any priority".
    pub priority: Option<Priority>,
}

impl IssueListQuery {
    /// Every issue of `kind`, regardless of priority.
    pub fn of_kind(kind: IssueType) -> Self {
        Self {
            kind: Some(kind),
            priority: None,
        }
    }
}

/// Issue store operations consumed by core services.
pub trait IssueRepository {
    fn list_issues(&self, query: &IssueListQuery) -> RepoResult<Vec<Issue>>;
    fn create_issue(&self, issue: &NewIssue) -> RepoResult<IssueId>;
}

impl<R: IssueRepository + ?Sized> IssueRepository for &R {
    fn list_issues(&self, query: &IssueListQuery) -> RepoResult<Vec<Issue>> {
        (**self).list_issues(query)
    }

    fn create_issue(&self, issue: &NewIssue) -> RepoResult<IssueId> {
        (**self).create_issue(issue)
    }
}

/// SQLite-backed issue store.
pub struct SqliteIssueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteIssueRepository<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Loads one issue by id.
    pub fn get_issue(&self, id: IssueId) -> RepoResult<Option<Issue>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ISSUE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_issue_row(row)?));
        }
        Ok(None)
    }
}

impl IssueRepository for SqliteIssueRepository<'_> {
    fn list_issues(&self, query: &IssueListQuery) -> RepoResult<Vec<Issue>> {
        let mut sql = format!("{ISSUE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = query.kind {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }
        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Integer(i64::from(priority.value())));
        }
        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut issues = Vec::new();
        while let Some(row) = rows.next()? {
            issues.push(parse_issue_row(row)?);
        }

        Ok(issues)
    }

    fn create_issue(&self, issue: &NewIssue) -> RepoResult<IssueId> {
        issue.validate()?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO issues (
                uuid,
                title,
                type,
                priority,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                issue.title.as_str(),
                issue.kind.as_str(),
                i64::from(issue.priority.value()),
                issue.description.as_str(),
            ],
        )?;

        Ok(id)
    }
}

fn parse_issue_row(row: &Row<'_>) -> RepoResult<Issue> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in issues.uuid"))
    })?;

    let type_text: String = row.get("type")?;
    let kind = IssueType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid issue type `{type_text}` in issues.type"))
    })?;

    let priority_value: i64 = row.get("priority")?;
    let priority = u8::try_from(priority_value)
        .ok()
        .and_then(|value| Priority::new(value).ok())
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid priority `{priority_value}` in issues.priority"
            ))
        })?;

    Ok(Issue {
        id,
        title: row.get("title")?,
        kind,
        priority,
        description: row.get("description")?,
    })
}
